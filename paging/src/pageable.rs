use crate::window::PageWindow;
use std::sync::Arc;

/// A restartable, ordered collection.
///
/// Every call to `stream` starts again from the first element. Sources are
/// never asked for their length.
pub trait Source<T>: Send + Sync {
    fn stream(&self) -> Box<dyn Iterator<Item = T> + '_>;
}

impl<T: Clone + Send + Sync> Source<T> for Vec<T> {
    fn stream(&self) -> Box<dyn Iterator<Item = T> + '_> {
        Box::new(self.iter().cloned())
    }
}

/// The result of a collection-returning operation that supports both
/// unbounded and windowed iteration.
pub trait Pageable<T: 'static> {
    fn iter_all(&self) -> Box<dyn Iterator<Item = T> + '_>;

    fn window(&self, window: PageWindow) -> Box<dyn Iterator<Item = T> + '_> {
        Box::new(self.iter_all().skip(window.start).take(window.limit))
    }
}

impl<T: 'static, P: Pageable<T> + ?Sized> Pageable<T> for &P {
    fn iter_all(&self) -> Box<dyn Iterator<Item = T> + '_> {
        (**self).iter_all()
    }

    fn window(&self, window: PageWindow) -> Box<dyn Iterator<Item = T> + '_> {
        (**self).window(window)
    }
}

impl<T: 'static, P: Pageable<T> + ?Sized> Pageable<T> for Arc<P> {
    fn iter_all(&self) -> Box<dyn Iterator<Item = T> + '_> {
        (**self).iter_all()
    }

    fn window(&self, window: PageWindow) -> Box<dyn Iterator<Item = T> + '_> {
        (**self).window(window)
    }
}

impl<T: Clone + Send + Sync + 'static> Pageable<T> for Vec<T> {
    fn iter_all(&self) -> Box<dyn Iterator<Item = T> + '_> {
        self.stream()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_window() {
        let items = vec![1, 2, 3, 4, 5];
        let page: Vec<_> = items.window(PageWindow::new(1, 2)).collect();
        assert_eq!(page, vec![2, 3]);

        let page: Vec<_> = items.window(PageWindow::new(4, 10)).collect();
        assert_eq!(page, vec![5]);

        assert_eq!(items.window(PageWindow::new(9, 10)).count(), 0);
    }

    #[test]
    fn test_window_through_references() {
        fn page<P: Pageable<char>>(pageable: P, window: PageWindow) -> Vec<char> {
            pageable.window(window).collect()
        }

        let items = vec!['a', 'b', 'c', 'd'];
        assert_eq!(page(&items, PageWindow::new(1, 2)), vec!['b', 'c']);

        let shared = Arc::new(items);
        assert_eq!(page(shared.clone(), PageWindow::new(3, 5)), vec!['d']);
        assert_eq!(page(&shared, PageWindow::default()).len(), 4);
    }

    #[test]
    fn test_sources_restart() {
        let items = vec!["a", "b"];
        let source: &dyn Source<&str> = &items;
        assert_eq!(source.stream().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(source.stream().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
