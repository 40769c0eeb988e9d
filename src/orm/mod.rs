pub mod blog_posts;
pub mod comments;
pub mod staff;
pub mod users;
