use std::io::{self, Write};

use serde::Serialize;

use crate::application::error::AppError;

use super::views::RenderedView;

pub fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::unexpected(format!("failed to render output: {e}")))?;
    write_stdout(&out)
}

pub fn print_view(view: &RenderedView, json: bool) -> Result<(), AppError> {
    if json {
        return print_json(view);
    }
    write_stdout(view.to_string().trim_end())
}

fn write_stdout(out: &str) -> Result<(), AppError> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{out}")
        .and_then(|()| stdout.flush())
        .map_err(|e| AppError::unexpected(format!("failed to write output: {e}")))
}
