//! Links.

use crate::mime::APPLICATION_JSON;
use serde::{Deserialize, Serialize};

/// Self link.
pub const SELF_REL: &str = "self";

/// Next-page link.
pub const NEXT_REL: &str = "next";

/// This object describes a relationship with another entity.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Link {
    /// The actual link in the format of an URL.
    pub href: String,

    /// Relationship between the current document and the linked document.
    pub rel: String,

    /// Media type of the referenced entity.
    #[serde(rename = "type")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,

    /// A human readable title to be used in rendered displays of the link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Link {
    /// Creates a new link with the provided href and rel type.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf::Link;
    /// let link = Link::new("http://mf.test/collections", "self");
    /// assert_eq!(link.rel, "self");
    /// ```
    pub fn new(href: impl ToString, rel: impl ToString) -> Link {
        Link {
            href: href.to_string(),
            rel: rel.to_string(),
            r#type: None,
            title: None,
        }
    }

    /// Creates a self link.
    pub fn self_(href: impl ToString) -> Link {
        Link::new(href, SELF_REL)
    }

    /// Creates a next-page link.
    pub fn next(href: impl ToString) -> Link {
        Link::new(href, NEXT_REL)
    }

    /// Sets this link's media type to JSON.
    pub fn json(mut self) -> Link {
        self.r#type = Some(APPLICATION_JSON.to_string());
        self
    }

    /// Sets this link's media type.
    pub fn with_type(mut self, r#type: impl ToString) -> Link {
        self.r#type = Some(r#type.to_string());
        self
    }

    /// Sets this link's title.
    pub fn title(mut self, title: impl ToString) -> Link {
        self.title = Some(title.to_string());
        self
    }
}
