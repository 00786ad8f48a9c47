//! Builders for domain rows used across tests.

use chrono::Utc;

use crate::domain::{
    ForumComment, ForumPost, Lesson, Module, PostCategory, Role, Topic, UserProfile,
};

/// A module with no topics.
pub fn module(id: &str, order: i32) -> Module {
    Module {
        id: id.into(),
        title: format!("Module {id}"),
        description: String::new(),
        order_index: order,
        is_published: true,
        cover_image_url: None,
        topics: Vec::new(),
    }
}

/// A topic with no lessons, attached to nothing until pushed.
pub fn topic(id: &str, module_id: &str, order: i32) -> Topic {
    Topic {
        id: id.into(),
        title: format!("Topic {id}"),
        description: String::new(),
        order_index: order,
        is_published: true,
        module_id: module_id.into(),
        lessons: Vec::new(),
    }
}

pub fn lesson(id: &str, topic_id: &str, order: i32) -> Lesson {
    Lesson {
        id: id.into(),
        title: format!("Lesson {id}"),
        description: String::new(),
        order_index: order,
        is_published: true,
        youtube_url: None,
        topic_id: topic_id.into(),
    }
}

pub fn post(id: &str, author: &str, title: &str) -> ForumPost {
    ForumPost {
        id: id.into(),
        title: title.to_string(),
        content: format!("content of {title}"),
        category: PostCategory::General,
        image_url: None,
        created_at: Utc::now(),
        user_id: author.into(),
    }
}

pub fn comment(id: &str, post_id: &str, author: &str, content: &str) -> ForumComment {
    ForumComment {
        id: id.into(),
        content: content.to_string(),
        created_at: Utc::now(),
        post_id: post_id.into(),
        user_id: author.into(),
    }
}

pub fn profile(id: &str, name: &str, points: i64) -> UserProfile {
    UserProfile {
        id: id.into(),
        full_name: Some(name.to_string()),
        email: Some(format!("{id}@example.com")),
        points,
        role: Role::Student,
        created_at: Utc::now(),
    }
}

/// A profile with a role allowed to edit course content.
pub fn instructor(id: &str, name: &str) -> UserProfile {
    UserProfile {
        role: Role::Instructor,
        ..profile(id, name, 0)
    }
}
