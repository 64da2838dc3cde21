//! Depth-first walk over a node forest.
//!
//! The walk keeps its own work-list instead of recursing, so arbitrarily
//! deep trees cannot exhaust the call stack. Nodes are only borrowed, which
//! makes any number of walks over the same forest safe.

use crate::ast::Node;

/// Callbacks invoked by [`traverse`].
///
/// `enter` runs before a node's children are visited and `exit` after. Both
/// receive the parent element, or `None` for top-level nodes.
pub trait Visitor<'a> {
    fn enter(&mut self, node: &'a Node, parent: Option<&'a Node>) {
        let _ = (node, parent);
    }

    fn exit(&mut self, node: &'a Node, parent: Option<&'a Node>) {
        let _ = (node, parent);
    }
}

enum Step<'a> {
    Enter(&'a Node, Option<&'a Node>),
    Exit(&'a Node, Option<&'a Node>),
}

/// Walk `forest` in document order, calling the visitor on every node.
pub fn traverse<'a, V>(forest: &'a [Node], visitor: &mut V)
where
    V: Visitor<'a> + ?Sized,
{
    let mut stack: Vec<Step<'a>> = forest.iter().rev().map(|n| Step::Enter(n, None)).collect();

    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(node, parent) => {
                visitor.enter(node, parent);
                stack.push(Step::Exit(node, parent));
                stack.extend(
                    node.children()
                        .iter()
                        .rev()
                        .map(|child| Step::Enter(child, Some(node))),
                );
            }
            Step::Exit(node, parent) => visitor.exit(node, parent),
        }
    }
}

/// A [`Visitor`] built from a pair of closures.
pub struct FnVisitor<E, X> {
    enter: E,
    exit: X,
}

impl<E, X> FnVisitor<E, X> {
    pub fn new<'a>(enter: E, exit: X) -> Self
    where
        E: FnMut(&'a Node, Option<&'a Node>),
        X: FnMut(&'a Node, Option<&'a Node>),
    {
        Self { enter, exit }
    }
}

impl<'a, E, X> Visitor<'a> for FnVisitor<E, X>
where
    E: FnMut(&'a Node, Option<&'a Node>),
    X: FnMut(&'a Node, Option<&'a Node>),
{
    fn enter(&mut self, node: &'a Node, parent: Option<&'a Node>) {
        (self.enter)(node, parent);
    }

    fn exit(&mut self, node: &'a Node, parent: Option<&'a Node>) {
        (self.exit)(node, parent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ElementNode;
    use pretty_assertions::assert_eq;

    fn label(node: &Node) -> String {
        match node {
            Node::Element(el) => el.tag.to_string(),
            Node::Text(t) => format!("'{}'", t.content),
            Node::Comment(c) => format!("!{}", c.content),
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl<'a> Visitor<'a> for Recorder {
        fn enter(&mut self, node: &'a Node, parent: Option<&'a Node>) {
            let parent = parent.map(label).unwrap_or_else(|| "-".into());
            self.events.push(format!("enter {} in {}", label(node), parent));
        }

        fn exit(&mut self, node: &'a Node, _parent: Option<&'a Node>) {
            self.events.push(format!("exit {}", label(node)));
        }
    }

    fn sample() -> Vec<Node> {
        vec![
            ElementNode::new("view")
                .with_child(ElementNode::new("text").with_child(Node::text("hi")))
                .with_child(Node::comment("c"))
                .into(),
            ElementNode::new("image").self_closing().into(),
        ]
    }

    #[test]
    fn test_enter_exit_order() {
        let forest = sample();
        let mut recorder = Recorder::default();
        traverse(&forest, &mut recorder);

        assert_eq!(
            recorder.events,
            vec![
                "enter view in -",
                "enter text in view",
                "enter 'hi' in text",
                "exit 'hi'",
                "exit text",
                "enter !c in view",
                "exit !c",
                "exit view",
                "enter image in -",
                "exit image",
            ]
        );
    }

    #[test]
    fn test_closure_visitor_and_repeat_walks() {
        let forest = sample();
        let mut first = Vec::new();
        traverse(
            &forest,
            &mut FnVisitor::new(|node: &Node, _| first.push(label(node)), |_, _| {}),
        );
        let mut second = Vec::new();
        traverse(
            &forest,
            &mut FnVisitor::new(|node: &Node, _| second.push(label(node)), |_, _| {}),
        );
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn test_deep_tree_does_not_recurse() {
        let mut node: Node = ElementNode::new("view").into();
        for _ in 0..50_000 {
            node = ElementNode::new("view").with_child(node).into();
        }
        let forest = vec![node];

        let mut count = 0usize;
        traverse(&forest, &mut FnVisitor::new(|_, _| count += 1, |_, _| {}));
        assert_eq!(count, 50_001);

        // Drop iteratively as well; the derived drop would recurse.
        let mut pending = forest;
        while let Some(node) = pending.pop() {
            if let Node::Element(mut el) = node {
                pending.append(&mut el.children);
            }
        }
    }
}
