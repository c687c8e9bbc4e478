use std::fmt::{self, Display, Formatter};

/// The kinds of feed records a sweep can process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Post,
    Repost,
    Like,
}

impl Category {
    /// Collection NSID that holds records of this category in the user's repo.
    pub fn collection(&self) -> &'static str {
        match self {
            Category::Post => "app.bsky.feed.post",
            Category::Repost => "app.bsky.feed.repost",
            Category::Like => "app.bsky.feed.like",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Post => "post",
            Category::Repost => "repost",
            Category::Like => "like",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            Category::Post => "posts",
            Category::Repost => "reposts",
            Category::Like => "likes",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
