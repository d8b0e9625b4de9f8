//! Task control block access
//!
//! The trap only ever touches one field of a task: the saved stack
//! pointer. It sits at offset 0 of [`TaskHeader`], and a task control block
//! embeds the header as its first field, so a task reference is also the
//! address of its saved stack pointer.

use core::cell::UnsafeCell;
use core::ffi::c_void;
use core::mem::offset_of;
use core::ptr::NonNull;

use tickswitch_platform::StackWord;
use tickswitch_platform::frame::{TaskEntry, init_task_stack, stack_top};

/// The part of a task control block this layer reads and writes
#[repr(C)]
pub struct TaskHeader {
    top_of_stack: UnsafeCell<*mut StackWord>,
}

const _: () = assert!(offset_of!(TaskHeader, top_of_stack) == 0);

// Only written by the trap and by `prepare`, both of which exclude every
// other reader.
unsafe impl Sync for TaskHeader {}

impl TaskHeader {
    pub const fn new() -> Self {
        Self {
            top_of_stack: UnsafeCell::new(core::ptr::null_mut()),
        }
    }

    /// Build the initial frame of a never-run task on `stack` and record
    /// it as the saved stack pointer.
    ///
    /// # Safety
    /// `stack` must stay valid for as long as the task can be selected, be
    /// large enough for the initial frame, and the task must not be
    /// current.
    pub unsafe fn prepare(&self, stack: &mut [StackWord], entry: TaskEntry, param: *mut c_void) {
        let top = stack_top(stack);
        unsafe { *self.top_of_stack.get() = init_task_stack(top, entry, param) };
    }

    /// Address of the task's saved frame. Only meaningful while the task
    /// is suspended.
    pub fn saved_stack_pointer(&self) -> *mut StackWord {
        unsafe { *self.top_of_stack.get() }
    }
}

impl Default for TaskHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// A scheduler core's per-task record
///
/// # Safety
/// The type must be `#[repr(C)]` with the [`TaskHeader`] returned by
/// `header` as its first field.
pub unsafe trait TaskControlBlock: Sync {
    fn header(&self) -> &TaskHeader;
}

unsafe impl TaskControlBlock for TaskHeader {
    fn header(&self) -> &TaskHeader {
        self
    }
}

/// Reference to a task, as handed out by the scheduler core
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskRef(NonNull<TaskHeader>);

// A task reference is an address; dereferencing it is what needs masking.
unsafe impl Send for TaskRef {}
unsafe impl Sync for TaskRef {}

impl TaskRef {
    pub fn new<T: TaskControlBlock>(task: &'static T) -> Self {
        let header = NonNull::from(task.header());
        debug_assert_eq!(
            header.as_ptr() as usize,
            task as *const T as usize,
            "task header is not the first field"
        );
        Self(header)
    }

    pub(crate) fn from_ptr(ptr: *mut TaskHeader) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    pub fn as_ptr(self) -> *mut TaskHeader {
        self.0.as_ptr()
    }

    /// Read the saved stack pointer at offset 0.
    ///
    /// # Safety
    /// No one may be writing the field concurrently.
    pub(crate) unsafe fn saved_stack_pointer(self) -> *mut StackWord {
        unsafe { self.0.as_ptr().cast::<*mut StackWord>().read() }
    }

    /// # Safety
    /// Only the trap, for the task it just suspended.
    pub(crate) unsafe fn set_saved_stack_pointer(self, sp: *mut StackWord) {
        unsafe { self.0.as_ptr().cast::<*mut StackWord>().write(sp) }
    }
}
