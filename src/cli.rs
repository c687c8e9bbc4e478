use clap::Parser;

use crate::domain::CategoryFlags;

/// Delete your own Bluesky posts, reposts and likes that are older than the
/// configured retention window.
///
/// Settings are read from `config.json` in the working directory.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Cli {
    /// Only sweep posts
    #[arg(long)]
    pub only_posts: bool,

    /// Only sweep reposts
    #[arg(long)]
    pub only_reposts: bool,

    /// Only sweep likes
    #[arg(long)]
    pub only_likes: bool,

    /// Sweep likes as well as posts and reposts
    #[arg(long)]
    pub include_likes: bool,
}

impl Cli {
    pub fn category_flags(&self) -> CategoryFlags {
        CategoryFlags {
            only_posts: self.only_posts,
            only_reposts: self.only_reposts,
            only_likes: self.only_likes,
            include_likes: self.include_likes,
        }
    }
}
