use std::ffi::c_void;
use std::fmt;

/// Opaque, non-owning handle to host data.
///
/// The runtime stores, compares and forwards it; it never dereferences it.
/// The host guarantees the pointee outlives every script value wrapping it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostPtr(*mut c_void);

impl HostPtr {
    pub fn new<T>(ptr: *mut T) -> Self {
        HostPtr(ptr as *mut c_void)
    }

    pub fn from_ref<T>(r: &T) -> Self {
        HostPtr(r as *const T as *mut c_void)
    }

    pub fn from_addr(addr: usize) -> Self {
        HostPtr(addr as *mut c_void)
    }

    pub fn null() -> Self {
        HostPtr(std::ptr::null_mut())
    }

    pub fn addr(self) -> usize {
        self.0 as usize
    }

    pub fn is_null(self) -> bool {
        self.0.is_null()
    }

    /// Reinterprets the handle. Dereferencing the result is the host's call.
    pub fn cast<T>(self) -> *mut T {
        self.0 as *mut T
    }
}

impl fmt::Debug for HostPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostPtr({:#x})", self.addr())
    }
}
