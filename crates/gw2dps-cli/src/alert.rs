//! One-off user alerts that must be seen even without a console.

/// Tell the user the game could not be attached to.
///
/// On Windows this also pops a message box, since the meter is usually started
/// from a shortcut and the console closes on exit.
pub fn process_unavailable(image_name: &str, reason: &str) {
    let text = process_unavailable_text(image_name, reason);
    eprintln!("{text}");
    #[cfg(target_os = "windows")]
    show_message_box("gw2dps", &text);
}

fn process_unavailable_text(image_name: &str, reason: &str) -> String {
    format!("Could not attach to {image_name}: {reason}\nStart the game first, then run gw2dps again.")
}

#[cfg(target_os = "windows")]
fn show_message_box(caption: &str, text: &str) {
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::WindowsAndMessaging::{MB_ICONERROR, MB_OK, MessageBoxW};
    use windows::core::HSTRING;

    // SAFETY: both strings are valid, NUL-terminated and outlive the call.
    unsafe {
        MessageBoxW(
            HWND::default(),
            &HSTRING::from(text),
            &HSTRING::from(caption),
            MB_OK | MB_ICONERROR,
        );
    }
}
