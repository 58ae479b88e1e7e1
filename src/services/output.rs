use crate::domain::models::{ErrorBody, ErrorOut, JsonOut};
use crate::settings::SettingsTree;
use serde::Serialize;

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}

/// The settings tree is structured data either way; `--json` only adds the
/// envelope.
pub fn print_settings(json: bool, settings: &SettingsTree) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut {
                ok: true,
                data: settings
            })?
        );
    } else {
        println!("{}", serde_json::to_string_pretty(settings)?);
    }
    Ok(())
}

/// Failure rendering at the CLI boundary: the error envelope on stdout in
/// `--json` mode, plain message lines on stderr otherwise. Message content
/// for locked rejections is contract-exact, so nothing is prefixed.
pub fn print_failure(json: bool, code: &str, message: &str) {
    if json {
        let envelope = ErrorOut {
            ok: false,
            error: ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
            },
        };
        match serde_json::to_string_pretty(&envelope) {
            Ok(rendered) => println!("{rendered}"),
            Err(_) => eprintln!("{message}"),
        }
    } else {
        eprintln!("{message}");
    }
}
