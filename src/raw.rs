use std::{
    ffi::c_void,
    marker::PhantomData,
    mem::{
        align_of,
        size_of,
    },
    num::NonZeroUsize,
    os::fd::BorrowedFd,
    ptr::NonNull,
    sync::OnceLock,
};

use nix::{
    errno::Errno,
    sys::mman::{
        mmap,
        mremap,
        munmap,
        MapFlags,
        MRemapFlags,
        ProtFlags,
    },
    unistd::{
        sysconf,
        SysconfVar,
    },
};
use tracing::{
    debug,
    error,
    trace,
};

use crate::errors::Error;

const FALLBACK_PAGE_SIZE: usize = 4096;

fn page_size() -> usize {
    static PAGE_SIZE: OnceLock<usize> = OnceLock::new();
    *PAGE_SIZE.get_or_init(|| {
        sysconf(SysconfVar::PAGE_SIZE)
            .ok()
            .flatten()
            .and_then(|size| usize::try_from(size).ok())
            .filter(|size| *size > 0)
            .unwrap_or(FALLBACK_PAGE_SIZE)
    })
}

/// Page-granular anonymous mapping holding up to `capacity` values of `T`.
///
/// The buffer never reads or drops the values it holds; the owning list
/// tracks which slots are initialized.
pub(crate) struct RawBuffer<T>{
    start: NonNull<T>,
    capacity: usize,
    byte_capacity: usize,
    phantom: PhantomData<T>,
}

// SAFETY: the mapping is owned exclusively by this buffer.
unsafe impl<T: Send> Send for RawBuffer<T> {}
// SAFETY: shared access only hands out shared pointers to `T`.
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {

    pub(crate) fn max_capacity() -> usize {
        match size_of::<T>() {
            0 => isize::MAX as usize,
            size => isize::MAX as usize / size,
        }
    }

    pub(crate) fn allocate(capacity:usize) -> Result<Self, Error> {
        let page_size = page_size();
        if align_of::<T>() > page_size {
            return Err(Error::UnsupportedAlignment{
                align: align_of::<T>(),
                page_size,
            });
        }
        if capacity > Self::max_capacity() {
            return Err(Error::CapacityOverflow);
        }

        let byte_capacity = Self::mapped_len(capacity, page_size)?;
        let start = match NonZeroUsize::new(byte_capacity) {
            Some(len) => {
                let start = Self::map_anonymous(len)?;
                debug!(capacity, bytes = byte_capacity, "mapped backing store");
                start
            },
            None => NonNull::dangling(),
        };

        Ok(Self{
            start,
            capacity,
            byte_capacity,
            phantom: PhantomData,
        })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn ptr(&self) -> *mut T {
        self.start.as_ptr()
    }

    /// Raises the capacity to `new_capacity`, moving the mapping when the
    /// current pages cannot hold it. Live values keep their positions.
    pub(crate) fn grow_to(&mut self, new_capacity:usize) -> Result<(), Error> {
        if new_capacity <= self.capacity {
            return Ok(());
        }
        if new_capacity > Self::max_capacity() {
            return Err(Error::CapacityOverflow);
        }

        let new_byte_capacity = Self::mapped_len(new_capacity, page_size())?;
        if new_byte_capacity > self.byte_capacity {
            self.start = match NonZeroUsize::new(self.byte_capacity) {
                None => {
                    let len = NonZeroUsize::new(new_byte_capacity).ok_or(Error::CapacityOverflow)?;
                    Self::map_anonymous(len)?
                },
                Some(_) => {
                    let moved = unsafe{mremap(
                        self.start.as_ptr() as *mut c_void,
                        self.byte_capacity,
                        new_byte_capacity,
                        MRemapFlags::MREMAP_MAYMOVE,
                        None
                    )}.map_err(Error::MremapFail)?;
                    NonNull::new(moved as *mut T).ok_or(Error::MremapFail(Errno::ENOMEM))?
                },
            };
            trace!(
                old_bytes = self.byte_capacity,
                new_bytes = new_byte_capacity,
                "remapped backing store"
            );
            self.byte_capacity = new_byte_capacity;
        }

        trace!(old_capacity = self.capacity, new_capacity, "grew capacity");
        self.capacity = new_capacity;
        Ok(())
    }

    fn map_anonymous(len:NonZeroUsize) -> Result<NonNull<T>, Error> {
        let region = unsafe{mmap(
            None,
            len,
            ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
            MapFlags::MAP_PRIVATE | MapFlags::MAP_ANONYMOUS,
            None::<BorrowedFd>,
            0
        )}.map_err(Error::MmapFail)?;
        NonNull::new(region as *mut T).ok_or(Error::MmapFail(Errno::ENOMEM))
    }

    /// Bytes to map for `capacity` values, rounded up to whole pages.
    fn mapped_len(capacity:usize, page_size:usize) -> Result<usize, Error> {
        let bytes = capacity.checked_mul(size_of::<T>()).ok_or(Error::CapacityOverflow)?;
        if bytes == 0 {
            return Ok(0);
        }
        let pages = (bytes - 1) / page_size + 1;
        pages.checked_mul(page_size).ok_or(Error::CapacityOverflow)
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if self.byte_capacity == 0 {
            return;
        }
        let unmapped = unsafe{munmap(self.start.as_ptr() as *mut c_void, self.byte_capacity)};
        if let Err(errno) = unmapped {
            error!(%errno, bytes = self.byte_capacity, "munmap of backing store failed");
        }
    }
}
