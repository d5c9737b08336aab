use std::path::PathBuf;

use vtoolbar_core::link::LinkWriter;

/// Writer used by "Create Shortcut" and by files dropped on the toolbar.
pub fn link_writer() -> Box<dyn LinkWriter> {
    #[cfg(windows)]
    {
        Box::new(shell_link::ShellLinkWriter)
    }
    #[cfg(not(windows))]
    {
        Box::new(vtoolbar_core::link::CopyWriter)
    }
}

/// Without a native picker the UI asks for the target path in a prompt.
pub fn has_file_picker() -> bool {
    cfg!(windows)
}

pub fn pick_target_file() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        rfd::FileDialog::new()
            .set_title("Select a file to create a shortcut")
            .add_filter("Executable Files", &["exe"])
            .add_filter("All Files", &["*"])
            .pick_file()
    }
    #[cfg(not(windows))]
    {
        None
    }
}

/// Reports a failure that keeps the toolbar from opening. Release builds
/// on Windows have no console, so a message box is shown there.
pub fn show_startup_error(message: &str) {
    #[cfg(windows)]
    {
        let _ = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("Custom Toolbar")
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
    #[cfg(not(windows))]
    {
        eprintln!("Custom Toolbar: {message}");
    }
}

#[cfg(windows)]
mod shell_link {
    use std::io;
    use std::path::Path;

    use vtoolbar_core::link::LinkWriter;
    use windows::core::{Interface, HSTRING};
    use windows::Win32::System::Com::{
        CoCreateInstance, CoInitializeEx, IPersistFile, CLSCTX_INPROC_SERVER,
        COINIT_APARTMENTTHREADED,
    };
    use windows::Win32::UI::Shell::{IShellLinkW, ShellLink};

    /// Writes a `.lnk` shell link pointing at the target.
    pub struct ShellLinkWriter;

    impl LinkWriter for ShellLinkWriter {
        fn extension(&self, _target: &Path) -> String {
            ".lnk".to_string()
        }

        fn write_link(&self, target: &Path, link_path: &Path) -> io::Result<()> {
            unsafe {
                // The UI thread is usually initialised already (S_FALSE).
                let _ = CoInitializeEx(None, COINIT_APARTMENTTHREADED);

                let link: IShellLinkW =
                    CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER).map_err(to_io)?;
                link.SetPath(&HSTRING::from(target.as_os_str()))
                    .map_err(to_io)?;
                if let Some(dir) = target.parent() {
                    link.SetWorkingDirectory(&HSTRING::from(dir.as_os_str()))
                        .map_err(to_io)?;
                }

                let file: IPersistFile = link.cast().map_err(to_io)?;
                file.Save(&HSTRING::from(link_path.as_os_str()), true)
                    .map_err(to_io)?;
            }
            Ok(())
        }
    }

    fn to_io(e: windows::core::Error) -> io::Error {
        io::Error::other(e)
    }
}
