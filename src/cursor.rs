use crate::{
    errors::Error,
    ArrayList,
};

/// Fail-fast position in an [`ArrayList`].
///
/// A `Cursor` does not borrow its list; every step takes the list as an
/// argument and first compares the list's modification count with the one
/// recorded when the cursor was created. Any append, insert, removal or clear
/// made outside the cursor in between fails the step with
/// [`Error::ConcurrentModification`]. Removing through [`Cursor::remove`]
/// keeps the cursor in sync.
///
/// A cursor is finite and cannot be rewound; ask the list for a new one to
/// iterate again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor{
    position: usize,
    last_returned: Option<usize>,
    expected_modification_count: u64,
}

impl Cursor {

    pub(crate) fn new(expected_modification_count:u64) -> Self {
        Self{
            position: 0,
            last_returned: None,
            expected_modification_count,
        }
    }

    pub fn has_next<T>(&self, list:&ArrayList<T>) -> Result<bool, Error> {
        self.check_for_comodification(list)?;
        Ok(self.position < list.len())
    }

    pub fn next<'a, T>(&mut self, list:&'a ArrayList<T>) -> Result<&'a T, Error> {
        self.check_for_comodification(list)?;
        let index = self.position;
        let value = list.as_slice().get(index).ok_or(Error::NoSuchElement)?;
        self.position = index + 1;
        self.last_returned = Some(index);
        Ok(value)
    }

    /// Removes the element most recently returned by [`Cursor::next`].
    ///
    /// Fails with [`Error::InvalidState`] when nothing has been returned yet
    /// or the last returned element was already removed.
    pub fn remove<T>(&mut self, list:&mut ArrayList<T>) -> Result<T, Error> {
        let index = self.last_returned.ok_or(Error::InvalidState)?;
        self.check_for_comodification(list)?;
        let removed = list.remove_at(index)?;
        self.position = index;
        self.last_returned = None;
        self.expected_modification_count = list.modification_count();
        Ok(removed)
    }

    /// Feeds every element not yet returned to `action`, leaving the cursor
    /// exhausted.
    pub fn for_each_remaining<T, F>(&mut self, list:&ArrayList<T>, mut action:F) -> Result<(), Error>
    where
        F: FnMut(&T),
    {
        while self.position < list.len() {
            self.check_for_comodification(list)?;
            action(&list[self.position]);
            self.position += 1;
        }
        Ok(())
    }

    fn check_for_comodification<T>(&self, list:&ArrayList<T>) -> Result<(), Error> {
        let actual = list.modification_count();
        if actual != self.expected_modification_count {
            return Err(Error::ConcurrentModification{
                expected: self.expected_modification_count,
                actual,
            });
        }
        Ok(())
    }
}

/// A [`Cursor`] that holds its list mutably, so nothing else can touch the
/// list while it is alive. Elements are removed through
/// [`CursorMut::remove_current`].
pub struct CursorMut<'a, T>{
    list: &'a mut ArrayList<T>,
    cursor: Cursor,
}

impl<'a, T> CursorMut<'a, T> {

    pub(crate) fn new(list:&'a mut ArrayList<T>) -> Self {
        let cursor = list.cursor();
        Self{list, cursor}
    }

    pub fn has_next(&self) -> Result<bool, Error> {
        self.cursor.has_next(&*self.list)
    }

    pub fn next(&mut self) -> Result<&T, Error> {
        self.cursor.next(&*self.list)
    }

    pub fn remove_current(&mut self) -> Result<T, Error> {
        self.cursor.remove(self.list)
    }

    pub fn for_each_remaining<F>(&mut self, action:F) -> Result<(), Error>
    where
        F: FnMut(&T),
    {
        self.cursor.for_each_remaining(&*self.list, action)
    }
}
