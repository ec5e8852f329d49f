use std::ffi::c_void;
use std::fmt;
use std::num::NonZeroUsize;

/// A resolved, non-null function address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ProcAddr(NonZeroUsize);

impl ProcAddr {
	/// Returns `None` for zero, the "not found" answer of every lookup path.
	pub const fn new(raw: usize) -> Option<Self> {
		match NonZeroUsize::new(raw) {
			Some(raw) => Some(Self(raw)),
			None => None,
		}
	}

	pub fn from_ptr(ptr: *const c_void) -> Option<Self> {
		Self::new(ptr as usize)
	}

	pub const fn get(self) -> usize {
		self.0.get()
	}

	pub fn as_ptr(self) -> *const c_void {
		self.0.get() as *const c_void
	}

	/// Reinterprets the address as a function pointer type.
	///
	/// # Safety
	///
	/// `F` must be a pointer-sized function pointer type whose signature and ABI match
	/// the function at this address.
	pub unsafe fn cast<F: Copy>(self) -> F {
		assert_eq!(size_of::<F>(), size_of::<usize>(), "ProcAddr::cast target must be pointer-sized");
		let ptr = self.as_ptr();
		// SAFETY: sizes checked above; signature correctness is the caller's contract.
		unsafe { std::mem::transmute_copy::<*const c_void, F>(&ptr) }
	}
}

impl fmt::Debug for ProcAddr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ProcAddr({:#x})", self.0)
	}
}
