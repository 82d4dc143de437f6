use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, Context, Result};

pub trait ArchiveExtractor {
    fn extract(&self, archive_path: &Path, dst: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandExtractor;

impl ArchiveExtractor for CommandExtractor {
    fn extract(&self, archive_path: &Path, dst: &Path) -> Result<()> {
        if cfg!(windows) {
            let mut command = Command::new("powershell");
            command.arg("-NoProfile").arg("-Command").arg(format!(
                "Expand-Archive -LiteralPath '{}' -DestinationPath '{}' -Force",
                escape_ps_single_quote(archive_path),
                escape_ps_single_quote(dst)
            ));
            if run_command(
                &mut command,
                "failed to extract plugin package with powershell",
            )
            .is_ok()
            {
                return Ok(());
            }
        }

        let mut unzip_command = Command::new("unzip");
        unzip_command.arg("-q").arg(archive_path).arg("-d").arg(dst);
        if run_command(
            &mut unzip_command,
            "failed to extract plugin package with unzip",
        )
        .is_ok()
        {
            return Ok(());
        }

        run_command(
            Command::new("tar")
                .arg("-xf")
                .arg(archive_path)
                .arg("-C")
                .arg(dst),
            "failed to extract plugin package with tar fallback",
        )
    }
}

fn run_command(command: &mut Command, context_message: &str) -> Result<()> {
    let output = command
        .output()
        .with_context(|| format!("{context_message}: command failed to start"))?;
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    Err(anyhow!(
        "{context_message}: status={} stdout='{}' stderr='{}'",
        output.status,
        stdout.trim(),
        stderr.trim()
    ))
}

fn escape_ps_single_quote(path: &Path) -> String {
    let mut os = OsString::new();
    os.push(path.as_os_str());
    os.to_string_lossy().replace('\'', "''")
}
