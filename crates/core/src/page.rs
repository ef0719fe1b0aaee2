/// One page of a counted result set.
///
/// `number_matched` is the count of rows before paging; `number_returned`
/// is the count after.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// The rows on this page.
    pub items: Vec<T>,

    /// The number of rows that matched the selection, ignoring paging.
    pub number_matched: u64,

    /// The number of rows on this page.
    pub number_returned: u64,
}

impl<T> Page<T> {
    /// Creates a new page, deriving `number_returned` from the rows.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf::Page;
    /// let page = Page::new(vec![1, 2, 3], 10);
    /// assert_eq!(page.number_returned, 3);
    /// ```
    pub fn new(items: Vec<T>, number_matched: u64) -> Page<T> {
        let number_returned = items.len() as u64;
        Page {
            items,
            number_matched,
            number_returned,
        }
    }
}
