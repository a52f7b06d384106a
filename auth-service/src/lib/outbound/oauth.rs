pub mod google;

pub use google::GoogleOAuthProvider;
