//! Presenting the final pull request URL
//!
//! The URL is printed to stdout unless it was opened in a browser or copied
//! to the clipboard instead.

use anstream::println;
use prflow::error::{Error, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

/// Where the URL should go
#[derive(Debug, Clone, Copy, Default)]
pub struct Presentation {
    /// Open in the default browser
    pub browse: bool,
    /// Copy to the clipboard
    pub copy: bool,
}

/// Print, copy or open `url`
pub fn present_url(url: &str, how: Presentation) -> Result<()> {
    if how.copy {
        copy_to_clipboard(url)?;
    }
    if how.browse {
        open_in_browser(url)?;
    }
    if !how.browse && !how.copy {
        println!("{url}");
    }
    Ok(())
}

type Helper = (&'static str, &'static [&'static str]);

const NO_ARGS: &[&str] = &[];

#[cfg(target_os = "macos")]
const BROWSER: Helper = ("open", NO_ARGS);
#[cfg(windows)]
const BROWSER: Helper = ("cmd", &["/c", "start", ""]);
#[cfg(not(any(target_os = "macos", windows)))]
const BROWSER: Helper = ("xdg-open", NO_ARGS);

#[cfg(target_os = "macos")]
const CLIPBOARD: &[Helper] = &[("pbcopy", NO_ARGS)];
#[cfg(windows)]
const CLIPBOARD: &[Helper] = &[("clip", NO_ARGS)];
#[cfg(not(any(target_os = "macos", windows)))]
const CLIPBOARD: &[Helper] = &[
    ("wl-copy", NO_ARGS),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

fn open_in_browser(url: &str) -> Result<()> {
    let browser = std::env::var("BROWSER").ok().filter(|b| !b.trim().is_empty());
    let status = match browser {
        Some(cmd) => Command::new(cmd).arg(url).status(),
        None => {
            let (program, args) = BROWSER;
            Command::new(program).args(args).arg(url).status()
        }
    }
    .map_err(|e| Error::Presentation(format!("could not open a browser: {e}")))?;

    if !status.success() {
        return Err(Error::Presentation(format!("browser exited with {status}")));
    }
    Ok(())
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    for (program, args) in CLIPBOARD {
        let child = Command::new(program)
            .args(*args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        let mut child = match child {
            Ok(child) => child,
            Err(e) => {
                debug!(program, error = %e, "clipboard helper unavailable");
                continue;
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }
        if child.wait()?.success() {
            return Ok(());
        }
    }

    Err(Error::Presentation("no clipboard helper found".to_string()))
}
