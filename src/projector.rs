//! Content tree projector: flattens the module → topic → lesson tree
//! into positioned nodes and directed edges for the visual editor.
//!
//! This is a deterministic single-pass layout, not a constraint solver:
//! fixed spacing constants, top-to-bottom and left-to-right, no collision
//! avoidance. Re-run it whenever the underlying tree changes; it has no
//! side effects beyond producing new node and edge lists.

use serde::Serialize;

use crate::domain::{Lesson, Module, Topic};

/// Spacing constants for the layout pass, in canvas units.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    /// Vertical gap reserved per module, on top of its topics' share.
    pub module_spacing: f64,
    /// Vertical gap between sibling topics. Also the per-topic share of
    /// the module's reserved height.
    pub topic_spacing: f64,
    /// Vertical gap between sibling lessons.
    pub lesson_spacing: f64,
    /// Horizontal offset of each level from its parent column.
    pub column_width: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            module_spacing: 300.0,
            topic_spacing: 250.0,
            lesson_spacing: 200.0,
            column_width: 300.0,
        }
    }
}

/// 2D canvas position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Level of a node in the projected graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Module,
    Topic,
    Lesson,
}

/// Display payload carried by a projected node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeData {
    pub title: String,
    pub description: String,
    pub is_published: bool,
    /// Direct children: topics for a module, lessons for a topic, 0 for a lesson.
    pub child_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
}

/// A positioned node in the projected graph.
#[derive(Debug, Clone, Serialize)]
pub struct ContentNode {
    pub id: String,
    pub kind: NodeKind,
    pub position: Position,
    pub data: NodeData,
}

/// A directed parent → child edge.
#[derive(Debug, Clone, Serialize)]
pub struct ContentEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// The projector output: flat node and edge lists.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentGraph {
    pub nodes: Vec<ContentNode>,
    pub edges: Vec<ContentEdge>,
}

impl ContentGraph {
    /// Look up a node by its graph ID.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&ContentNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Outgoing edges of the given node.
    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a ContentEdge> {
        self.edges.iter().filter(move |e| e.source == id)
    }
}

/// Project a fetched module tree with the default spacing.
#[must_use]
pub fn project(modules: &[Module]) -> ContentGraph {
    project_with(modules, &LayoutConfig::default())
}

/// Project a fetched module tree into positioned nodes and edges.
///
/// Each module advances the vertical cursor by `module_spacing` plus
/// `topic_spacing` per topic, so modules with more topics push the next
/// module further down. A module with zero topics still occupies its
/// `module_spacing` slot. Lesson counts do not feed the accumulation;
/// a topic with many lessons can overlap the following module's rows.
#[must_use]
pub fn project_with(modules: &[Module], layout: &LayoutConfig) -> ContentGraph {
    let mut graph = ContentGraph::default();
    let mut y_offset = 0.0;

    for module in modules {
        graph.nodes.push(module_node(module, y_offset));

        for (topic_index, topic) in module.topics.iter().enumerate() {
            let topic_y = y_offset + topic_index as f64 * layout.topic_spacing;
            graph
                .nodes
                .push(topic_node(topic, layout.column_width, topic_y));
            graph.edges.push(ContentEdge {
                id: format!("edge-module-{}-topic-{}", module.id, topic.id),
                source: node_id(NodeKind::Module, module.id.as_str()),
                target: node_id(NodeKind::Topic, topic.id.as_str()),
            });

            for (lesson_index, lesson) in topic.lessons.iter().enumerate() {
                let lesson_y = topic_y + lesson_index as f64 * layout.lesson_spacing;
                graph
                    .nodes
                    .push(lesson_node(lesson, 2.0 * layout.column_width, lesson_y));
                graph.edges.push(ContentEdge {
                    id: format!("edge-topic-{}-lesson-{}", topic.id, lesson.id),
                    source: node_id(NodeKind::Topic, topic.id.as_str()),
                    target: node_id(NodeKind::Lesson, lesson.id.as_str()),
                });
            }
        }

        y_offset += layout.module_spacing + module.topics.len() as f64 * layout.topic_spacing;
    }

    graph
}

fn node_id(kind: NodeKind, raw: &str) -> String {
    let prefix = match kind {
        NodeKind::Module => "module",
        NodeKind::Topic => "topic",
        NodeKind::Lesson => "lesson",
    };
    format!("{prefix}-{raw}")
}

fn module_node(module: &Module, y: f64) -> ContentNode {
    ContentNode {
        id: node_id(NodeKind::Module, module.id.as_str()),
        kind: NodeKind::Module,
        position: Position { x: 0.0, y },
        data: NodeData {
            title: module.title.clone(),
            description: module.description.clone(),
            is_published: module.is_published,
            child_count: module.topics.len(),
            youtube_url: None,
        },
    }
}

fn topic_node(topic: &Topic, x: f64, y: f64) -> ContentNode {
    ContentNode {
        id: node_id(NodeKind::Topic, topic.id.as_str()),
        kind: NodeKind::Topic,
        position: Position { x, y },
        data: NodeData {
            title: topic.title.clone(),
            description: topic.description.clone(),
            is_published: topic.is_published,
            child_count: topic.lessons.len(),
            youtube_url: None,
        },
    }
}

fn lesson_node(lesson: &Lesson, x: f64, y: f64) -> ContentNode {
    ContentNode {
        id: node_id(NodeKind::Lesson, lesson.id.as_str()),
        kind: NodeKind::Lesson,
        position: Position { x, y },
        data: NodeData {
            title: lesson.title.clone(),
            description: lesson.description.clone(),
            is_published: lesson.is_published,
            child_count: 0,
            youtube_url: lesson.youtube_url.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LessonId, ModuleId, TopicId};

    fn lesson(id: &str, topic: &str, order: i32) -> Lesson {
        Lesson {
            id: LessonId::new(id),
            title: format!("Lesson {id}"),
            description: String::new(),
            order_index: order,
            is_published: true,
            youtube_url: None,
            topic_id: TopicId::new(topic),
        }
    }

    fn topic(id: &str, module: &str, order: i32, lessons: Vec<Lesson>) -> Topic {
        Topic {
            id: TopicId::new(id),
            title: format!("Topic {id}"),
            description: String::new(),
            order_index: order,
            is_published: true,
            module_id: ModuleId::new(module),
            lessons,
        }
    }

    fn module(id: &str, order: i32, topics: Vec<Topic>) -> Module {
        Module {
            id: ModuleId::new(id),
            title: format!("Module {id}"),
            description: String::new(),
            order_index: order,
            is_published: true,
            cover_image_url: None,
            topics,
        }
    }

    #[test]
    fn empty_input_produces_empty_graph() {
        let graph = project(&[]);
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn module_reserves_vertical_space_per_topic() {
        let topics: Vec<Topic> = (0..4)
            .map(|i| topic(&format!("t{i}"), "m1", i, vec![]))
            .collect();
        let modules = vec![module("m1", 1, topics), module("m2", 2, vec![])];

        let graph = project(&modules);
        let first = graph.node("module-m1").unwrap();
        let second = graph.node("module-m2").unwrap();

        // At least 4 * topic_spacing between the two module rows.
        assert!(second.position.y - first.position.y >= 4.0 * 250.0);
        assert_eq!(second.position.y, 300.0 + 4.0 * 250.0);
    }

    #[test]
    fn zero_topic_module_still_occupies_its_slot() {
        let modules = vec![module("m1", 1, vec![]), module("m2", 2, vec![])];
        let graph = project(&modules);
        assert_eq!(graph.node("module-m2").unwrap().position.y, 300.0);
    }

    #[test]
    fn columns_step_right_per_level() {
        let modules = vec![module(
            "m1",
            1,
            vec![topic("t1", "m1", 1, vec![lesson("l1", "t1", 1)])],
        )];
        let graph = project(&modules);

        assert_eq!(graph.node("module-m1").unwrap().position.x, 0.0);
        assert_eq!(graph.node("topic-t1").unwrap().position.x, 300.0);
        assert_eq!(graph.node("lesson-l1").unwrap().position.x, 600.0);
    }

    #[test]
    fn lessons_stack_below_their_topic_row() {
        let modules = vec![module(
            "m1",
            1,
            vec![
                topic("t1", "m1", 1, vec![]),
                topic(
                    "t2",
                    "m1",
                    2,
                    vec![lesson("l1", "t2", 1), lesson("l2", "t2", 2)],
                ),
            ],
        )];
        let graph = project(&modules);

        let topic_y = graph.node("topic-t2").unwrap().position.y;
        assert_eq!(topic_y, 250.0);
        assert_eq!(graph.node("lesson-l1").unwrap().position.y, topic_y);
        assert_eq!(graph.node("lesson-l2").unwrap().position.y, topic_y + 200.0);
    }

    #[test]
    fn every_edge_endpoint_exists_in_node_list() {
        let modules = vec![
            module(
                "m1",
                1,
                vec![
                    topic("t1", "m1", 1, vec![lesson("l1", "t1", 1)]),
                    topic("t2", "m1", 2, vec![]),
                ],
            ),
            module("m2", 2, vec![topic("t3", "m2", 1, vec![])]),
        ];
        let graph = project(&modules);

        for edge in &graph.edges {
            assert!(graph.node(&edge.source).is_some(), "dangling source {}", edge.id);
            assert!(graph.node(&edge.target).is_some(), "dangling target {}", edge.id);
        }
    }

    #[test]
    fn two_module_scenario_counts() {
        // First module: 1 topic with 2 lessons. Second module: no topics.
        let modules = vec![
            module(
                "m1",
                1,
                vec![topic(
                    "t1",
                    "m1",
                    1,
                    vec![lesson("l1", "t1", 1), lesson("l2", "t1", 2)],
                )],
            ),
            module("m2", 2, vec![]),
        ];
        let graph = project(&modules);

        let modules_count = graph.nodes.iter().filter(|n| n.kind == NodeKind::Module).count();
        let topics_count = graph.nodes.iter().filter(|n| n.kind == NodeKind::Topic).count();
        let lessons_count = graph.nodes.iter().filter(|n| n.kind == NodeKind::Lesson).count();
        assert_eq!((modules_count, topics_count, lessons_count), (2, 1, 2));
        assert_eq!(graph.edges.len(), 3);

        let edge_ids: Vec<&str> = graph.edges.iter().map(|e| e.id.as_str()).collect();
        assert!(edge_ids.contains(&"edge-module-m1-topic-t1"));
        assert!(edge_ids.contains(&"edge-topic-t1-lesson-l1"));
        assert!(edge_ids.contains(&"edge-topic-t1-lesson-l2"));

        assert_eq!(graph.edges_from("module-m2").count(), 0);
    }

    #[test]
    fn node_payload_carries_counts_and_video() {
        let mut l = lesson("l1", "t1", 1);
        l.youtube_url = Some("https://youtu.be/abc".into());
        let modules = vec![module("m1", 1, vec![topic("t1", "m1", 1, vec![l])])];
        let graph = project(&modules);

        assert_eq!(graph.node("module-m1").unwrap().data.child_count, 1);
        assert_eq!(graph.node("topic-t1").unwrap().data.child_count, 1);
        assert_eq!(
            graph.node("lesson-l1").unwrap().data.youtube_url.as_deref(),
            Some("https://youtu.be/abc")
        );
    }

    #[test]
    fn projection_is_deterministic() {
        let modules = vec![module(
            "m1",
            1,
            vec![topic("t1", "m1", 1, vec![lesson("l1", "t1", 1)])],
        )];
        let a = project(&modules);
        let b = project(&modules);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }
}
