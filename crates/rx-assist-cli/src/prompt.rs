//! Interactive quantity input.

use std::io::{self, BufRead, Write};

use rx_assist_core::MatchedMedicine;

/// Parse a `NAME=QTY` command-line pair.
pub fn parse_quantity_arg(s: &str) -> Result<(String, u32), String> {
    let (name, qty) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=QTY, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing medicine name in '{s}'"));
    }
    let qty = qty
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{s}'"))?;
    Ok((name.to_string(), qty))
}

/// Ask for a quantity between 1 and `available` until a valid answer arrives.
pub fn prompt_quantity<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    medicine: &str,
    available: u32,
) -> io::Result<u32> {
    loop {
        write!(output, "Enter quantity for {medicine} (available: {available}): ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("input ended before a quantity for {medicine} was given"),
            ));
        }

        match line.trim().parse::<u32>() {
            Ok(qty) if (1..=available).contains(&qty) => return Ok(qty),
            _ => writeln!(
                output,
                "Please enter a whole number between 1 and {available}."
            )?,
        }
    }
}

/// Pair every matched medicine with a requested quantity.
///
/// Quantities given up front (matched case-insensitively by inventory name)
/// are used as-is and capped later. Out-of-stock medicines are not prompted
/// for; they request one unit so the order reports the shortfall.
pub fn collect_quantities<R: BufRead, W: Write>(
    matched: &[MatchedMedicine],
    preset: &[(String, u32)],
    input: &mut R,
    output: &mut W,
) -> io::Result<Vec<(MatchedMedicine, u32)>> {
    let mut selections = Vec::with_capacity(matched.len());

    for m in matched {
        let given = preset
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(m.medicine_name()))
            .map(|(_, qty)| *qty);

        let qty = match given {
            Some(qty) => qty,
            None if m.available() == 0 => 1,
            None => prompt_quantity(input, output, m.medicine_name(), m.available())?,
        };
        selections.push((m.clone(), qty));
    }

    Ok(selections)
}
