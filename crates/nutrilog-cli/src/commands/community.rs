use clap::Subcommand;
use nutrilog_core::clock::now_ms;
use nutrilog_core::community::relative_time;
use nutrilog_core::CommunityPost;
use serde::Serialize;

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum CommunityAction {
    /// Print the feed, newest first
    List,
    /// Share a status update
    Post {
        content: String,
        /// Author name (default: profile name)
        #[arg(long)]
        author: Option<String>,
    },
    /// Like or unlike a post
    Like { id: String },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FeedEntry<'a> {
    #[serde(flatten)]
    post: &'a CommunityPost,
    posted: String,
}

pub fn run(action: CommunityAction) -> CmdResult {
    let store = open_store()?;

    match action {
        CommunityAction::List => {
            let now = now_ms();
            let posts = store.posts()?;
            let feed: Vec<FeedEntry> = posts
                .iter()
                .map(|post| FeedEntry {
                    post,
                    posted: relative_time(post.timestamp, now),
                })
                .collect();
            print_json(&feed)?;
        }
        CommunityAction::Post { content, author } => {
            let author = match author {
                Some(a) => a,
                None => store.profile()?.map(|p| p.name).unwrap_or_default(),
            };
            let post = CommunityPost::status(&author, &content, now_ms())?;
            let (_, event) = store.save_post(post)?;
            print_json(&event)?;
        }
        CommunityAction::Like { id } => match store.toggle_like(&id)? {
            (_, Some(event)) => print_json(&event)?,
            (_, None) => return Err(format!("no post '{id}'").into()),
        },
    }
    Ok(())
}
