//! Интерактивный предсказатель цены

use std::io::{BufRead, Write};

use crate::error::{PipelineError, Result};
use crate::models::PricePredictor;
use crate::types::Location;

const WIDTH: usize = 45;

/// Один запрос: площадь, спальни, локация. Ошибочный ввод печатается
/// пользователю, запрос отменяется, результат `Ok(None)`.
pub fn run_predictor<R: BufRead, W: Write>(
    model: &PricePredictor,
    rmse: f64,
    mut input: R,
    mut output: W,
) -> Result<Option<f64>> {
    writeln!(output, "\n{}", "=".repeat(WIDTH))?;
    writeln!(output, "{:=^width$}", " HOUSE PRICE PREDICTOR ", width = WIDTH)?;
    writeln!(output, "{}", "=".repeat(WIDTH))?;
    writeln!(output, "Model Accuracy (RMSE): ${}", format_currency(rmse))?;
    writeln!(output, "{}", "-".repeat(WIDTH))?;

    match read_request(&mut input, &mut output) {
        Ok((area, bedrooms, location)) => {
            let prediction = model.predict(area, bedrooms, location);
            let line = format!(" ESTIMATED HOUSE PRICE: ${} ", format_currency(prediction));

            writeln!(output, "\n{}", "*".repeat(WIDTH))?;
            writeln!(output, "{:*^width$}", line, width = WIDTH)?;
            writeln!(output, "{}", "*".repeat(WIDTH))?;
            Ok(Some(prediction))
        }
        Err(PipelineError::InvalidInput(message)) => {
            tracing::debug!("Prediction request rejected: {}", message);
            writeln!(output, "\n[!] {}", message)?;
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn read_request<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<(f64, i64, Location)> {
    let area = prompt(input, output, "\nEnter Area (sq. ft) [e.g. 5000]: ")?;
    let area: f64 = area
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(numeric_error)?;

    let bedrooms = prompt(input, output, "Enter Number of Rooms (Bedrooms) [e.g. 3]: ")?;
    let bedrooms: i64 = bedrooms.parse().map_err(|_| numeric_error())?;

    writeln!(output, "\nLocation Options:")?;
    writeln!(output, "1. New York")?;
    writeln!(output, "2. Florida")?;
    writeln!(output, "3. Atlanta")?;
    let choice = prompt(input, output, "Select Location (1/2/3): ")?;
    let location = Location::from_choice(&choice).ok_or_else(|| {
        PipelineError::InvalidInput("Invalid choice. Please select 1, 2, or 3.".to_string())
    })?;

    Ok((area, bedrooms, location))
}

fn numeric_error() -> PipelineError {
    PipelineError::InvalidInput("Invalid input. Please enter numbers for area/rooms.".to_string())
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(PipelineError::InvalidInput("Unexpected end of input.".to_string()));
    }
    Ok(line.trim().to_string())
}

/// `1234567.891` -> `1,234,567.89`
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("{}", value);
    }

    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}
