use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tweetline",
    about = "Post, edit, comment on, like and retweet short posts",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// SQLite database file holding the tweet records.
    #[arg(long, global = true, env = "TWEETLINE_DB", default_value = "tweetline.sqlite3")]
    pub db: PathBuf,

    /// Caller identity used for ownership and like membership.
    #[arg(long = "as", global = true, env = "TWEETLINE_IDENTITY")]
    pub identity: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, global = true, env = "TWEETLINE_LOG_DIR")]
    pub log_dir: Option<String>,

    #[arg(long, global = true, env = "TWEETLINE_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show one tweet
    Get(TweetRef),
    /// List every tweet (ascending id order)
    List,
    /// Post a new tweet
    Post(PostArgs),
    /// Replace the content of your tweet
    Edit(EditArgs),
    /// Delete your tweet
    Delete(TweetRef),
    /// Comment on a tweet
    Comment(CommentArgs),
    /// Delete your comment
    Uncomment(UncommentArgs),
    /// Like a tweet
    Like(TweetRef),
    /// Withdraw your like
    Unlike(TweetRef),
    /// Retweet under your own username
    Retweet(RetweetArgs),
}

impl Command {
    /// Stable operation name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Get(_) => "get",
            Self::List => "list",
            Self::Post(_) => "post",
            Self::Edit(_) => "edit",
            Self::Delete(_) => "delete",
            Self::Comment(_) => "comment",
            Self::Uncomment(_) => "uncomment",
            Self::Like(_) => "like",
            Self::Unlike(_) => "unlike",
            Self::Retweet(_) => "retweet",
        }
    }
}

#[derive(Args)]
pub struct TweetRef {
    pub id: String,
}

#[derive(Args)]
pub struct PostArgs {
    pub content: String,
    #[arg(short, long)]
    pub username: String,
}

#[derive(Args)]
pub struct EditArgs {
    pub id: String,
    pub content: String,
}

#[derive(Args)]
pub struct CommentArgs {
    pub tweet_id: String,
    pub content: String,
    #[arg(short, long)]
    pub username: String,
}

#[derive(Args)]
pub struct UncommentArgs {
    pub tweet_id: String,
    pub comment_id: String,
}

#[derive(Args)]
pub struct RetweetArgs {
    pub tweet_id: String,
    #[arg(short, long)]
    pub username: String,
}
