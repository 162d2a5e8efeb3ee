use nix::errno::Errno;
use thiserror::Error;


#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error{
    #[error("illegal capacity: {capacity}")]
    InvalidArgument{
        capacity: isize,
    },
    #[error("Index: {index}, Size: {size}")]
    IndexOutOfRange{
        index: usize,
        size: usize,
    },
    #[error("list modified during iteration (expected modification count {expected}, found {actual})")]
    ConcurrentModification{
        expected: u64,
        actual: u64,
    },
    #[error("cursor has no element to remove")]
    InvalidState,
    #[error("cursor is exhausted")]
    NoSuchElement,
    #[error("requested capacity exceeds the maximum sequence length")]
    CapacityOverflow,
    #[error("element alignment {align} exceeds the page size {page_size}")]
    UnsupportedAlignment{
        align: usize,
        page_size: usize,
    },
    #[error("call to mmap failed: {0}")]
    MmapFail(Errno),
    #[error("call to mremap failed: {0}")]
    MremapFail(Errno),
}
