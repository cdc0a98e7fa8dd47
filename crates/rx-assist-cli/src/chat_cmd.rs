//! CLI Chat Command
//!
//! OCR a prescription, then answer questions about it one at a time.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;

use rx_assist_core::ocr::Preprocessor;
use rx_assist_llm::{ChatSession, GeminiClient, LlmClient};

use crate::config::Config;
use crate::ocr_cmd::ocr_image;

pub fn run(config: &Config, image: &Path, questions: &[String]) -> Result<()> {
    let outcome = ocr_image(config, image, &Preprocessor::chat());
    if let Some(error) = &outcome.error {
        eprintln!("{error}");
    }

    if outcome.text.is_empty() {
        println!("No text could be extracted. Please provide a prescription image.");
        return Ok(());
    }

    println!("Extracted Prescription Text:\n{}\n", outcome.text);

    let client = GeminiClient::new(
        &config.llm_base_url,
        &config.llm_model,
        config.api_key.clone(),
        config.llm_timeout_secs,
    )?;
    let session = ChatSession::new(outcome.text, client);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let interactive = questions.is_empty();
    let mut input = stdin.lock();
    let mut output = stdout.lock();

    if interactive {
        writeln!(output, "Ask a question about your prescription (blank line to quit):")?;
    }
    answer_questions(&session, questions, &mut input, &mut output)?;
    Ok(())
}

/// Answer `questions`, or every line of `input` when none were given.
///
/// Reading stops at EOF or a blank line. A failed answer is reported and the
/// loop moves on. Returns how many questions were answered successfully.
pub fn answer_questions<C, R, W>(
    session: &ChatSession<C>,
    questions: &[String],
    input: &mut R,
    output: &mut W,
) -> io::Result<usize>
where
    C: LlmClient,
    R: BufRead,
    W: Write,
{
    let mut answered = 0;

    let mut ask = |question: &str, output: &mut W| -> io::Result<()> {
        match session.ask(question) {
            Ok(answer) => {
                writeln!(output, "Assistant's Response:\n{answer}\n")?;
                answered += 1;
            }
            Err(e) => writeln!(output, "Error generating response: {e}\n")?,
        }
        Ok(())
    };

    if questions.is_empty() {
        let mut line = String::new();
        loop {
            write!(output, "> ")?;
            output.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 || line.trim().is_empty() {
                break;
            }
            ask(line.trim(), &mut *output)?;
        }
    } else {
        for question in questions {
            ask(question, &mut *output)?;
        }
    }

    Ok(answered)
}
