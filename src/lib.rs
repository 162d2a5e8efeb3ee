//! A growable array list over an anonymous memory mapping.
//!
//! [`ArrayList`] keeps its elements contiguous, grows by half of its current
//! capacity when full, and counts structural modifications so that a
//! [`Cursor`] can detect a list that changed underneath it.
//!
//! ```
//! use dyn_array_list::ArrayList;
//!
//! let mut list = ArrayList::new()?;
//! list.append(1)?;
//! list.append(3)?;
//! list.insert(1, 2)?;
//! assert_eq!(list, [1, 2, 3][..]);
//! assert_eq!(list.remove_at(0)?, 1);
//! # Ok::<(), dyn_array_list::Error>(())
//! ```


mod cursor;
mod errors;
mod raw;

pub mod benchmark;

use std::{
    slice,
    fmt::{
        self,
        Debug,
        Formatter,
    },
    collections::hash_map::DefaultHasher,
    hash::{
        Hash,
        Hasher,
    },
    mem,
    ops::{
        Deref,
        Index,
        IndexMut,
    },
    ptr,
};

pub use cursor::{
    Cursor,
    CursorMut,
};
pub use errors::Error;

use raw::RawBuffer;

/// Capacity of a list created by [`ArrayList::new`], and the smallest
/// capacity any list starts with.
pub const DEFAULT_CAPACITY: usize = 10;

pub struct ArrayList<T>{
    buffer: RawBuffer<T>,
    len: usize,
    modification_count: u64,
}

impl<T> ArrayList<T> {

    pub fn new() -> Result<Self, Error> {
        Self::with_capacity(DEFAULT_CAPACITY as isize)
    }

    /// Creates a list able to hold at least `initial_capacity` elements
    /// (never fewer than [`DEFAULT_CAPACITY`]) before it has to grow.
    ///
    /// A negative capacity is rejected with [`Error::InvalidArgument`].
    pub fn with_capacity(initial_capacity:isize) -> Result<Self, Error> {
        let requested = usize::try_from(initial_capacity)
            .map_err(|_| Error::InvalidArgument{capacity: initial_capacity})?;
        let buffer = RawBuffer::allocate(requested.max(DEFAULT_CAPACITY))?;
        Ok(Self{
            buffer,
            len: 0,
            modification_count: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Number of structural modifications (appends, inserts, removals,
    /// clears, bulk additions) made so far. Replacing a value does not count.
    pub fn modification_count(&self) -> u64 {
        self.modification_count
    }

    pub fn as_slice(&self) -> &[T] {
        unsafe{slice::from_raw_parts(self.buffer.ptr(), self.len)}
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe{slice::from_raw_parts_mut(self.buffer.ptr(), self.len)}
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Starts a fail-fast cursor at the first element.
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.modification_count)
    }

    /// Starts a cursor that holds the list for its whole lifetime and can
    /// remove the element it last yielded.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut::new(self)
    }

    pub fn append(&mut self, value:T) -> Result<(), Error> {
        let required = self.len.checked_add(1).ok_or(Error::CapacityOverflow)?;
        self.ensure_capacity(required)?;
        unsafe{ptr::write(self.buffer.ptr().add(self.len), value)};
        self.len += 1;
        self.modification_count += 1;
        Ok(())
    }

    /// Inserts `value` at `index`, shifting `[index, len)` one slot right.
    pub fn insert(&mut self, index:usize, value:T) -> Result<(), Error> {
        if index > self.len {
            return Err(self.out_of_range(index));
        }
        let required = self.len.checked_add(1).ok_or(Error::CapacityOverflow)?;
        self.ensure_capacity(required)?;
        unsafe{
            let slot = self.buffer.ptr().add(index);
            ptr::copy(slot, slot.add(1), self.len - index);
            ptr::write(slot, value);
        }
        self.len += 1;
        self.modification_count += 1;
        Ok(())
    }

    pub fn remove_at(&mut self, index:usize) -> Result<T, Error> {
        self.check_index(index)?;
        Ok(self.fast_remove(index))
    }

    pub fn get(&self, index:usize) -> Result<&T, Error> {
        self.as_slice().get(index).ok_or(self.out_of_range(index))
    }

    pub fn get_mut(&mut self, index:usize) -> Result<&mut T, Error> {
        let error = self.out_of_range(index);
        self.as_mut_slice().get_mut(index).ok_or(error)
    }

    /// Replaces the value at `index` and returns the previous one. This is
    /// not a structural modification, so live cursors stay valid.
    pub fn set(&mut self, index:usize, value:T) -> Result<T, Error> {
        Ok(mem::replace(self.get_mut(index)?, value))
    }

    pub fn add_all<I>(&mut self, other:I) -> Result<bool, Error>
    where
        I: IntoIterator<Item = T>,
    {
        let mut incoming: Vec<T> = other.into_iter().collect();
        let count = incoming.len();
        let required = self.len.checked_add(count).ok_or(Error::CapacityOverflow)?;
        self.ensure_capacity(required)?;
        unsafe{
            ptr::copy_nonoverlapping(incoming.as_ptr(), self.buffer.ptr().add(self.len), count);
            incoming.set_len(0);
        }
        self.len += count;
        if count == 0 {
            return Ok(false);
        }
        self.modification_count += 1;
        Ok(true)
    }

    /// Drops every element; the capacity is kept.
    pub fn clear(&mut self) {
        let len = self.len;
        self.len = 0;
        unsafe{ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.buffer.ptr(), len))};
        self.modification_count += 1;
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.as_slice().to_vec()
    }

    fn ensure_capacity(&mut self, min_capacity:usize) -> Result<(), Error> {
        if min_capacity <= self.buffer.capacity() {
            return Ok(());
        }
        let new_capacity = grown_capacity(
            self.buffer.capacity(),
            min_capacity,
            RawBuffer::<T>::max_capacity(),
        )?;
        self.buffer.grow_to(new_capacity)
    }

    fn check_index(&self, index:usize) -> Result<(), Error> {
        if index >= self.len {
            return Err(self.out_of_range(index));
        }
        Ok(())
    }

    fn out_of_range(&self, index:usize) -> Error {
        Error::IndexOutOfRange{
            index,
            size: self.len,
        }
    }

    // `index` must be below `len`.
    fn fast_remove(&mut self, index:usize) -> T {
        self.len -= 1;
        let removed = unsafe{
            let slot = self.buffer.ptr().add(index);
            let removed = ptr::read(slot);
            ptr::copy(slot.add(1), slot, self.len - index);
            removed
        };
        self.modification_count += 1;
        removed
    }
}

impl<T: PartialEq> ArrayList<T> {

    /// Position of the first element equal to `value`.
    pub fn index_of(&self, value:&T) -> Option<usize> {
        self.iter().position(|elem| elem == value)
    }

    pub fn contains(&self, value:&T) -> bool {
        self.index_of(value).is_some()
    }

    /// Removes the first element equal to `value`. Returns whether one was
    /// found; a miss leaves the list and its modification count untouched.
    pub fn remove_value(&mut self, value:&T) -> bool {
        match self.index_of(value) {
            Some(index) => {
                self.fast_remove(index);
                true
            },
            None => false,
        }
    }

    pub fn contains_all(&self, other:&[T]) -> bool {
        other.iter().all(|value| self.contains(value))
    }

    /// Removes every element that also appears in `other`.
    pub fn remove_all(&mut self, other:&[T]) -> Result<bool, Error> {
        self.remove_matching(|value| other.contains(value))
    }

    /// Removes every element that does not appear in `other`.
    pub fn retain_all(&mut self, other:&[T]) -> Result<bool, Error> {
        self.remove_matching(|value| !other.contains(value))
    }

    fn remove_matching<F>(&mut self, mut doomed:F) -> Result<bool, Error>
    where
        F: FnMut(&T) -> bool,
    {
        let mut modified = false;
        let mut cursor = self.cursor_mut();
        while cursor.has_next()? {
            if doomed(cursor.next()?) {
                cursor.remove_current()?;
                modified = true;
            }
        }
        Ok(modified)
    }
}

impl<T: Hash> ArrayList<T> {

    /// Order-sensitive hash: starting from 1, each element folds in as
    /// `h = 31 * h + hash(element)` with wrapping arithmetic. Equal lists
    /// hash equally.
    pub fn hash_code(&self) -> u64 {
        self.iter().fold(1u64, |hash, value| {
            hash.wrapping_mul(31).wrapping_add(element_hash(value))
        })
    }
}

fn element_hash<T: Hash + ?Sized>(value:&T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Next capacity for a list of `old` slots that needs at least `min`:
/// one and a half times `old`, saturating at `max`, never below `min`.
pub(crate) fn grown_capacity(old:usize, min:usize, max:usize) -> Result<usize, Error> {
    if min > max {
        return Err(Error::CapacityOverflow);
    }
    let candidate = old.saturating_add(old >> 1).min(max);
    Ok(candidate.max(min))
}

impl<T> Drop for ArrayList<T> {
    fn drop(&mut self) {
        unsafe{ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.buffer.ptr(), self.len))};
    }
}

impl<T> Deref for ArrayList<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> Index<usize> for ArrayList<T> {
    type Output = T;

    fn index(&self, index:usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<T> IndexMut<usize> for ArrayList<T> {

    fn index_mut(&mut self, index:usize) -> &mut Self::Output {
        &mut self.as_mut_slice()[index]
    }
}

impl<'a, T> IntoIterator for &'a ArrayList<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for ArrayList<T> {
    fn eq(&self, other:&Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for ArrayList<T> {}

impl<T: PartialEq> PartialEq<[T]> for ArrayList<T> {
    fn eq(&self, other:&[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for ArrayList<T> {
    fn eq(&self, other:&Vec<T>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Hash> Hash for ArrayList<T> {
    fn hash<H: Hasher>(&self, state:&mut H) {
        state.write_u64(self.hash_code());
    }
}

impl<T:Debug> Debug for ArrayList<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("ArrayList")
           .field("len", &self.len)
           .field("capacity", &self.capacity())
           .field("modification_count", &self.modification_count)
           .field("content", &self.as_slice())
           .finish()
    }
}
