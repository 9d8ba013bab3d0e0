//! Per-descriptor read cache control
//!
//! The read phase must hit the device, not the page cache. macOS can switch
//! caching off for a descriptor outright; Linux has no such switch, so the
//! file's cached pages are dropped through `posix_fadvise` instead.

use std::fs::File;
use std::io;

/// Disable (or, where the OS only offers eviction, flush) read caching for `file`
pub fn disable_read_cache(file: &File) -> io::Result<()> {
    platform::disable_read_cache(file)
}

#[cfg(target_os = "macos")]
mod platform {
    use super::*;
    use std::os::unix::io::AsRawFd;

    pub fn disable_read_cache(file: &File) -> io::Result<()> {
        // SAFETY: the descriptor is owned by `file` and stays open for the call
        let res = unsafe { libc::fcntl(file.as_raw_fd(), libc::F_NOCACHE, 1) };
        if res == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
mod platform {
    use super::*;
    use std::os::unix::io::AsRawFd;

    pub fn disable_read_cache(file: &File) -> io::Result<()> {
        advise(file, libc::POSIX_FADV_DONTNEED)?;
        advise(file, libc::POSIX_FADV_SEQUENTIAL)
    }

    fn advise(file: &File, advice: libc::c_int) -> io::Result<()> {
        // offset 0, len 0 covers the whole file
        // SAFETY: the descriptor is owned by `file` and stays open for the call
        let res = unsafe { libc::posix_fadvise(file.as_raw_fd(), 0, 0, advice) };
        // posix_fadvise returns the error number instead of setting errno
        if res != 0 {
            return Err(io::Error::from_raw_os_error(res));
        }
        Ok(())
    }
}

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "android")))]
mod platform {
    use super::*;

    pub fn disable_read_cache(_file: &File) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "disabling the read cache is not supported on this platform",
        ))
    }
}
