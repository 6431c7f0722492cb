//! Data sources
//!
//! A windowed container never holds the whole data set. It asks a
//! [`DataSource`] for the few items its slots currently show.

use std::ops::Range;
use std::rc::Rc;
use std::sync::Arc;

use glide_core::ConfigError;

/// Read-only access to the items a container displays
pub trait DataSource {
    type Item;

    /// Item at `index`, or `None` if the index is out of range
    fn item_at(&self, index: usize) -> Option<Self::Item>;

    /// Current number of items. May change between calls.
    fn count(&self) -> usize;

    /// Hint that `range` is about to be displayed
    fn prefetch(&self, _range: Range<usize>) {}
}

impl<T: Clone> DataSource for Vec<T> {
    type Item = T;

    fn item_at(&self, index: usize) -> Option<T> {
        self.get(index).cloned()
    }

    fn count(&self) -> usize {
        self.len()
    }
}

impl<D: DataSource + ?Sized> DataSource for Arc<D> {
    type Item = D::Item;

    fn item_at(&self, index: usize) -> Option<D::Item> {
        (**self).item_at(index)
    }

    fn count(&self) -> usize {
        (**self).count()
    }

    fn prefetch(&self, range: Range<usize>) {
        (**self).prefetch(range)
    }
}

impl<D: DataSource + ?Sized> DataSource for Rc<D> {
    type Item = D::Item;

    fn item_at(&self, index: usize) -> Option<D::Item> {
        (**self).item_at(index)
    }

    fn count(&self) -> usize {
        (**self).count()
    }

    fn prefetch(&self, range: Range<usize>) {
        (**self).prefetch(range)
    }
}

/// Item count given either as a number or as a callback
pub enum ItemCount {
    Fixed(usize),
    Dynamic(Box<dyn Fn() -> usize>),
}

impl ItemCount {
    pub fn get(&self) -> usize {
        match self {
            ItemCount::Fixed(n) => *n,
            ItemCount::Dynamic(f) => f(),
        }
    }
}

impl From<usize> for ItemCount {
    fn from(n: usize) -> Self {
        ItemCount::Fixed(n)
    }
}

impl std::fmt::Debug for ItemCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemCount::Fixed(n) => f.debug_tuple("Fixed").field(n).finish(),
            ItemCount::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

type ItemFn<T> = Box<dyn Fn(usize) -> Option<T>>;
type PrefetchFn = Box<dyn Fn(Range<usize>)>;

/// Data source assembled from host callbacks
pub struct FnDataSource<T> {
    item_at: ItemFn<T>,
    count: ItemCount,
    prefetch: Option<PrefetchFn>,
}

impl<T> FnDataSource<T> {
    pub fn builder() -> FnDataSourceBuilder<T> {
        FnDataSourceBuilder {
            item_at: None,
            count: None,
            prefetch: None,
        }
    }
}

impl<T> DataSource for FnDataSource<T> {
    type Item = T;

    fn item_at(&self, index: usize) -> Option<T> {
        if index >= self.count.get() {
            return None;
        }
        (self.item_at)(index)
    }

    fn count(&self) -> usize {
        self.count.get()
    }

    fn prefetch(&self, range: Range<usize>) {
        if let Some(prefetch) = &self.prefetch {
            prefetch(range);
        }
    }
}

/// Builder for [`FnDataSource`]; `item_at` and `count` are required
pub struct FnDataSourceBuilder<T> {
    item_at: Option<ItemFn<T>>,
    count: Option<ItemCount>,
    prefetch: Option<PrefetchFn>,
}

impl<T> FnDataSourceBuilder<T> {
    pub fn item_at<F: Fn(usize) -> Option<T> + 'static>(mut self, f: F) -> Self {
        self.item_at = Some(Box::new(f));
        self
    }

    /// Fixed number of items
    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(ItemCount::Fixed(count));
        self
    }

    /// Number of items read on every access
    pub fn count_with<F: Fn() -> usize + 'static>(mut self, f: F) -> Self {
        self.count = Some(ItemCount::Dynamic(Box::new(f)));
        self
    }

    pub fn prefetch<F: Fn(Range<usize>) + 'static>(mut self, f: F) -> Self {
        self.prefetch = Some(Box::new(f));
        self
    }

    pub fn build(self) -> Result<FnDataSource<T>, ConfigError> {
        let item_at = self.item_at.ok_or(ConfigError::MissingCallback("item_at"))?;
        let count = self.count.ok_or(ConfigError::MissingCallback("count"))?;
        Ok(FnDataSource {
            item_at,
            count,
            prefetch: self.prefetch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[test]
    fn test_vec_source() {
        let data = vec!["a", "b", "c"];
        assert_eq!(data.count(), 3);
        assert_eq!(data.item_at(1), Some("b"));
        assert_eq!(data.item_at(3), None);
    }

    #[test]
    fn test_builder_requires_callbacks() {
        let missing_item = FnDataSource::<u32>::builder().count(3).build();
        assert_eq!(missing_item.err(), Some(ConfigError::MissingCallback("item_at")));

        let missing_count = FnDataSource::builder().item_at(|i| Some(i)).build();
        assert_eq!(missing_count.err(), Some(ConfigError::MissingCallback("count")));
    }

    #[test]
    fn test_dynamic_count_bounds_items() {
        let len = Rc::new(Cell::new(5usize));
        let len_clone = len.clone();
        let source = FnDataSource::builder()
            .item_at(|i| Some(i * 10))
            .count_with(move || len_clone.get())
            .build()
            .unwrap();

        assert_eq!(source.item_at(4), Some(40));
        len.set(2);
        assert_eq!(source.count(), 2);
        assert_eq!(source.item_at(4), None);
    }

    #[test]
    fn test_prefetch_forwarded() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let source = Rc::new(
            FnDataSource::builder()
                .item_at(|i| Some(i))
                .count(100)
                .prefetch(move |r| seen_clone.borrow_mut().push(r))
                .build()
                .unwrap(),
        );

        source.prefetch(3..9);
        assert_eq!(*seen.borrow(), vec![3..9]);
    }
}
