/// Last-in-first-out history of previously displayed root content.
///
/// Unbounded unless a maximum depth is given, in which case the oldest
/// entry is evicted on overflow.
#[derive(Debug, Clone)]
pub struct NavigationStack<T> {
    entries: Vec<T>,
    max_depth: Option<usize>,
}

impl<T> Default for NavigationStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NavigationStack<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            max_depth: None,
        }
    }

    pub fn with_max_depth(max_depth: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            max_depth,
        }
    }

    /// Push an entry, returning whatever was evicted to respect the depth limit
    pub fn push(&mut self, entry: T) -> Option<T> {
        self.entries.push(entry);
        match self.max_depth {
            Some(max) if self.entries.len() > max => Some(self.entries.remove(0)),
            _ => None,
        }
    }

    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop()
    }

    /// The oldest entry, i.e. the root of the history
    pub fn peek_bottom(&self) -> Option<&T> {
        self.entries.first()
    }

    pub fn peek(&self) -> Option<&T> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
