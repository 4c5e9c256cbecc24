//! Concatenation of independently paged sources into one offset-addressable
//! view.
//!
//! Sources are laid end to end in the order they were given; nothing is
//! interleaved or sorted. A window over the merged view skips by pulling and
//! discarding elements, so sources never need to report their length, and a
//! later source is only opened once every earlier one is exhausted.

use crate::errors::PagingError;
use crate::pageable::{Pageable, Source};
use crate::window::PageWindow;
use std::sync::Arc;

pub struct MergeIterator<'a, T> {
    pending: std::vec::IntoIter<&'a dyn Source<T>>,
    current: Option<Box<dyn Iterator<Item = T> + 'a>>,
    skip: usize,
    remaining: usize,
}

impl<'a, T: 'a> MergeIterator<'a, T> {
    pub fn new(window: PageWindow, sources: Vec<&'a dyn Source<T>>) -> Self {
        MergeIterator {
            pending: sources.into_iter(),
            current: None,
            skip: window.start,
            remaining: window.limit,
        }
    }

    fn next_element(&mut self) -> Option<T> {
        loop {
            if let Some(iter) = self.current.as_mut() {
                if let Some(item) = iter.next() {
                    return Some(item);
                }
                self.current = None;
            }
            let source = self.pending.next()?;
            self.current = Some(source.stream());
        }
    }
}

impl<'a, T: 'a> Iterator for MergeIterator<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }

        while self.skip > 0 {
            if self.next_element().is_none() {
                self.remaining = 0;
                return None;
            }
            self.skip -= 1;
        }

        match self.next_element() {
            Some(item) => {
                self.remaining -= 1;
                Some(item)
            }
            None => {
                self.remaining = 0;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl<'a, T: 'a> std::iter::FusedIterator for MergeIterator<'a, T> {}

/// Windowed concatenation of exactly two sources.
pub fn combine<'a, T: 'a>(
    window: PageWindow,
    first: &'a dyn Source<T>,
    second: &'a dyn Source<T>,
) -> MergeIterator<'a, T> {
    MergeIterator::new(window, vec![first, second])
}

/// A collection composed of several sources whose identifier spaces may
/// collide. It can only be addressed by position.
pub struct MergedContainer<T> {
    sources: Vec<Arc<dyn Source<T>>>,
}

impl<T> MergedContainer<T> {
    pub fn new(sources: Vec<Arc<dyn Source<T>>>) -> Self {
        MergedContainer { sources }
    }

    /// Lookup by identifier is refused: the same id may name an element of
    /// more than one source.
    pub fn get(&self, id: &str) -> Result<T, PagingError> {
        Err(PagingError::UnsupportedLookup(id.to_string()))
    }
}

impl<T: 'static> Pageable<T> for MergedContainer<T> {
    fn iter_all(&self) -> Box<dyn Iterator<Item = T> + '_> {
        self.window(PageWindow::default())
    }

    fn window(&self, window: PageWindow) -> Box<dyn Iterator<Item = T> + '_> {
        let sources: Vec<&dyn Source<T>> = self.sources.iter().map(|s| s.as_ref()).collect();
        Box::new(MergeIterator::new(window, sources))
    }
}
