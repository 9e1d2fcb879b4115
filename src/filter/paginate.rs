/// Une page de résultats (numérotée à partir de 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub page_count: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn is_last(&self) -> bool {
        self.number >= self.page_count
    }
}

/// Découpe `items` ; une page hors bornes est ramenée dans `[1, page_count]`.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let page_count = total.div_ceil(page_size);
    let number = page.clamp(1, page_count.max(1));
    let items = items
        .into_iter()
        .skip((number - 1) * page_size)
        .take(page_size)
        .collect();
    Page {
        items,
        number,
        page_count,
        total,
    }
}
