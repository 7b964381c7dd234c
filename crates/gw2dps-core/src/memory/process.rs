//! Attaching to the game process.
//!
//! Only Windows is supported; elsewhere `open` always fails so the rest of the
//! library (and its tests) still builds.

use tracing::debug;

use crate::error::{Error, Result};

/// Default image name of the game client
pub const GAME_IMAGE_NAME: &str = "Gw2.exe";

/// An opened process together with the image base of its main module
pub struct ProcessHandle {
    pub pid: u32,
    pub base_address: u64,
    #[cfg(target_os = "windows")]
    handle: windows::Win32::Foundation::HANDLE,
}

#[cfg(target_os = "windows")]
impl ProcessHandle {
    /// Find a running process by image name and open it for reading
    pub fn find_and_open(image_name: &str) -> Result<Self> {
        let pid = platform::find_process_id(image_name)?;
        Self::open(pid, image_name)
    }

    /// Open a process by id; `image_name` selects the module whose base is used
    pub fn open(pid: u32, image_name: &str) -> Result<Self> {
        use windows::Win32::System::Threading::{
            OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ,
        };

        // SAFETY: OpenProcess has no memory-safety preconditions; the handle is
        // closed in Drop.
        let handle = unsafe { OpenProcess(PROCESS_QUERY_INFORMATION | PROCESS_VM_READ, false, pid) }
            .map_err(|e| Error::ProcessOpenFailed(format!("pid {}: {}", pid, e)))?;

        let mut process = Self {
            pid,
            base_address: 0,
            handle,
        };
        process.base_address = platform::find_module_base(pid, image_name)?;
        debug!(
            "Opened {} (pid {}, base {:#x})",
            image_name, pid, process.base_address
        );

        Ok(process)
    }

    pub fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;

        let mut buffer = vec![0u8; size];
        let mut read = 0usize;
        // SAFETY: the buffer is exactly `size` bytes long and outlives the call;
        // ReadProcessMemory only writes into it.
        unsafe {
            ReadProcessMemory(
                self.handle,
                address as *const _,
                buffer.as_mut_ptr() as *mut _,
                size,
                Some(&mut read),
            )
        }
        .map_err(|e| Error::read_failed(address, e.to_string()))?;

        if read != size {
            return Err(Error::read_failed(
                address,
                format!("partial read ({} of {} bytes)", read, size),
            ));
        }
        Ok(buffer)
    }
}

#[cfg(target_os = "windows")]
impl Drop for ProcessHandle {
    fn drop(&mut self) {
        use windows::Win32::Foundation::CloseHandle;

        if !self.handle.is_invalid() {
            // SAFETY: the handle came from OpenProcess and is closed exactly once.
            let _ = unsafe { CloseHandle(self.handle) };
        }
    }
}

#[cfg(target_os = "windows")]
mod platform {
    use windows::Win32::Foundation::{CloseHandle, HANDLE};
    use windows::Win32::System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, MODULEENTRY32W, Module32FirstW, Module32NextW,
        PROCESSENTRY32W, Process32FirstW, Process32NextW, TH32CS_SNAPMODULE,
        TH32CS_SNAPMODULE32, TH32CS_SNAPPROCESS,
    };

    use crate::error::{Error, Result};

    fn wide_to_string(buf: &[u16]) -> String {
        let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
        String::from_utf16_lossy(&buf[..len])
    }

    fn close(snapshot: HANDLE) {
        // SAFETY: snapshot handles are closed exactly once, right after use.
        let _ = unsafe { CloseHandle(snapshot) };
    }

    pub fn find_process_id(image_name: &str) -> Result<u32> {
        // SAFETY: creating a process snapshot has no preconditions.
        let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }
            .map_err(|e| Error::ProcessNotFound(format!("{}: {}", image_name, e)))?;

        let mut entry = PROCESSENTRY32W {
            dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };

        let mut found = None;
        // SAFETY: `entry` is a properly sized PROCESSENTRY32W.
        let mut next = unsafe { Process32FirstW(snapshot, &mut entry) };
        while next.is_ok() {
            if wide_to_string(&entry.szExeFile).eq_ignore_ascii_case(image_name) {
                found = Some(entry.th32ProcessID);
                break;
            }
            // SAFETY: as above.
            next = unsafe { Process32NextW(snapshot, &mut entry) };
        }
        close(snapshot);

        found.ok_or_else(|| Error::ProcessNotFound(image_name.to_string()))
    }

    pub fn find_module_base(pid: u32, module_name: &str) -> Result<u64> {
        // SAFETY: creating a module snapshot has no preconditions.
        let snapshot =
            unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32, pid) }
                .map_err(|e| Error::ModuleNotFound(format!("{}: {}", module_name, e)))?;

        let mut entry = MODULEENTRY32W {
            dwSize: std::mem::size_of::<MODULEENTRY32W>() as u32,
            ..Default::default()
        };

        let mut found = None;
        // SAFETY: `entry` is a properly sized MODULEENTRY32W.
        let mut next = unsafe { Module32FirstW(snapshot, &mut entry) };
        while next.is_ok() {
            if wide_to_string(&entry.szModule).eq_ignore_ascii_case(module_name) {
                found = Some(entry.modBaseAddr as u64);
                break;
            }
            // SAFETY: as above.
            next = unsafe { Module32NextW(snapshot, &mut entry) };
        }
        close(snapshot);

        found.ok_or_else(|| Error::ModuleNotFound(module_name.to_string()))
    }
}

#[cfg(not(target_os = "windows"))]
impl ProcessHandle {
    pub fn find_and_open(image_name: &str) -> Result<Self> {
        debug!("Process attach requested for {} on an unsupported platform", image_name);
        Err(Error::ProcessNotFound(format!(
            "{} (attaching is only supported on Windows)",
            image_name
        )))
    }

    pub fn open(pid: u32, image_name: &str) -> Result<Self> {
        debug!("Process attach requested for pid {} on an unsupported platform", pid);
        Err(Error::ProcessOpenFailed(format!(
            "{} (attaching is only supported on Windows)",
            image_name
        )))
    }

    pub fn read_bytes(&self, address: u64, _size: usize) -> Result<Vec<u8>> {
        Err(Error::read_failed(address, "unsupported platform"))
    }
}
