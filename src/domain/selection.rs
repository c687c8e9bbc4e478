use super::Category;

/// Raw category selection switches as given on the command line.
///
/// The switches are not validated against each other. When more than one is
/// set, the first match in this order wins: `only_posts`, `only_reposts`,
/// `only_likes`, `include_likes`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryFlags {
    pub only_posts: bool,
    pub only_reposts: bool,
    pub only_likes: bool,
    pub include_likes: bool,
}

/// Categories to sweep, in processing order.
pub fn select_categories(flags: CategoryFlags) -> Vec<Category> {
    if flags.only_posts {
        vec![Category::Post]
    } else if flags.only_reposts {
        vec![Category::Repost]
    } else if flags.only_likes {
        vec![Category::Like]
    } else if flags.include_likes {
        vec![Category::Post, Category::Repost, Category::Like]
    } else {
        vec![Category::Post, Category::Repost]
    }
}
