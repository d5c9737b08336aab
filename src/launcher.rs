use std::io;
use std::path::Path;

/// Opens a shortcut the way the shell would on double click. `.lnk` files
/// are resolved to their target by the shell itself.
#[cfg(windows)]
pub fn launch(path: &Path) -> io::Result<()> {
    use windows::core::HSTRING;
    use windows::Win32::UI::Shell::ShellExecuteW;
    use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

    let result = unsafe {
        ShellExecuteW(
            None,
            &HSTRING::from("open"),
            &HSTRING::from(path.as_os_str()),
            None,
            None,
            SW_SHOWNORMAL,
        )
    };
    // Values up to 32 are error codes.
    if result.0 as isize <= 32 {
        return Err(io::Error::other(format!(
            "ShellExecute failed with code {}",
            result.0 as isize
        )));
    }
    Ok(())
}

#[cfg(not(windows))]
pub fn launch(path: &Path) -> io::Result<()> {
    open_with_desktop(path)
}

pub fn open_folder(dir: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        std::process::Command::new("explorer.exe")
            .arg(dir)
            .spawn()
            .map(|_| ())
    }
    #[cfg(not(windows))]
    {
        open_with_desktop(dir)
    }
}

#[cfg(not(windows))]
fn open_with_desktop(path: &Path) -> io::Result<()> {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    std::process::Command::new(opener)
        .arg(path)
        .spawn()
        .map(|_| ())
}
