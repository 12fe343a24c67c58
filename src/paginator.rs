/// Splits an ordered post list into index pages. There is always at least
/// one page, so an empty blog still gets its first index page.
pub struct Paginator<'a, T> {
    items: &'a [T],
    page_size: u32,
    page_count: u32,
}

impl<'a, T> Paginator<'a, T> {
    pub fn new(items: &'a [T], page_size: u32) -> Self {
        let page_size = page_size.max(1);
        let page_count = match items.len() as u32 {
            0 => 1,
            count => (count - 1) / page_size + 1,
        };

        Paginator {
            items,
            page_size,
            page_count,
        }
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Items of page `page`, 1 based.
    pub fn get_page(&self, page: u32) -> Result<&'a [T], String> {
        match page {
            0 => return Err("Page has to be greater than 0".to_string()),
            x if x > self.page_count => return Err(format!("Page has to be less than page_count ({})", self.page_count)),
            _ => {}
        };

        let start = ((page - 1) * self.page_size) as usize;
        let end = (start + self.page_size as usize).min(self.items.len());
        Ok(&self.items[start.min(end)..end])
    }

    /// `(page number, items)` for every page, in order.
    pub fn pages(&self) -> impl Iterator<Item = (u32, &'a [T])> + '_ {
        (1..=self.page_count).filter_map(move |n| self.get_page(n).ok().map(|items| (n, items)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_case() {
        let items = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13];
        let paginator = Paginator::new(&items, 3);
        assert_eq!(paginator.page_count(), 5);
        assert_eq!(paginator.get_page(1), Ok([1, 2, 3].as_slice()));
        assert_eq!(paginator.get_page(2), Ok([4, 5, 6].as_slice()));
        assert_eq!(paginator.get_page(4), Ok([10, 11, 12].as_slice()));
        assert_eq!(paginator.get_page(5), Ok([13].as_slice()));

        assert_eq!(paginator.get_page(0), Err("Page has to be greater than 0".to_string()));
        assert_eq!(paginator.get_page(6), Err("Page has to be less than page_count (5)".to_string()));
    }

    #[test]
    fn test_exact_pages() {
        let items = vec![1, 2, 3, 4];
        let paginator = Paginator::new(&items, 2);
        let pages: Vec<_> = paginator.pages().collect();
        assert_eq!(pages, vec![(1, [1, 2].as_slice()), (2, [3, 4].as_slice())]);
    }

    #[test]
    fn test_empty() {
        let items: Vec<u32> = vec![];
        let paginator = Paginator::new(&items, 3);
        assert_eq!(paginator.page_count(), 1);
        assert_eq!(paginator.get_page(1), Ok([].as_slice()));
        assert_eq!(paginator.get_page(2), Err("Page has to be less than page_count (1)".to_string()));
    }
}
