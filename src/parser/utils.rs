use derive_more::with_trait::Display;

/// Position of a character in a source document.
///
/// All three coordinates are zero-based and counted in characters. The
/// [`Display`] form is the one-based `line:column` pair used in error
/// messages.
#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("{}:{}", line + 1, col + 1)]
pub struct SourcePosition {
    index: usize,
    line: usize,
    col: usize,
}

impl SourcePosition {
    #[doc(hidden)]
    pub fn new(index: usize, line: usize, col: usize) -> Self {
        debug_assert!(index >= line + col, "index counts every preceding char");
        Self { index, line, col }
    }

    #[doc(hidden)]
    pub fn new_origin() -> Self {
        Self::default()
    }

    #[doc(hidden)]
    pub fn advance_col(&mut self) {
        self.index += 1;
        self.col += 1;
    }

    #[doc(hidden)]
    pub fn advance_line(&mut self) {
        self.index += 1;
        self.line += 1;
        self.col = 0;
    }

    /// Offset of the character from the start of the source.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Line of the character, the first one being `0`.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Column of the character within its line, the first one being `0`.
    pub fn column(&self) -> usize {
        self.col
    }
}

/// Half-open range of a source document: `end` is the first position past
/// the range.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Span {
    /// First position inside the range.
    pub start: SourcePosition,
    /// First position after the range.
    pub end: SourcePosition,
}

/// An item along with the [`Span`] it was parsed from.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[display("{item}. At {}", span.start)]
pub struct Spanning<T> {
    /// Wrapped item.
    pub item: T,
    /// Where the item was found.
    pub span: Span,
}

impl<T> Spanning<T> {
    #[doc(hidden)]
    pub fn new(span: Span, item: T) -> Self {
        Self { item, span }
    }

    #[doc(hidden)]
    pub fn start_end(&start: &SourcePosition, &end: &SourcePosition, item: T) -> Self {
        Self::new(Span { start, end }, item)
    }

    #[doc(hidden)]
    pub fn zero_width(pos: &SourcePosition, item: T) -> Self {
        Self::start_end(pos, pos, item)
    }

    #[doc(hidden)]
    pub fn single_width(pos: &SourcePosition, item: T) -> Self {
        let mut end = *pos;
        end.advance_col();
        Self::start_end(pos, &end, item)
    }

    /// Wraps an item that doesn't come from any source document, like a
    /// value converted from JSON.
    pub fn unlocated(item: T) -> Self {
        Self::new(Span::default(), item)
    }

    /// Position where the item starts.
    pub fn start(&self) -> SourcePosition {
        self.span.start
    }

    /// Position right after the item.
    pub fn end(&self) -> SourcePosition {
        self.span.end
    }

    /// Maps the item, keeping its [`Span`].
    pub fn map<O>(self, f: impl FnOnce(T) -> O) -> Spanning<O> {
        Spanning::new(self.span, f(self.item))
    }

    /// Borrows the item, keeping its [`Span`].
    pub fn as_ref(&self) -> Spanning<&T> {
        Spanning::new(self.span, &self.item)
    }
}

impl<T: std::error::Error> std::error::Error for Spanning<T> {}
