//! Reconciliation of the optimized tree back into the host tree.
//!
//! # The Algorithm
//!
//! 1. **Plan** (host tree read-only):
//!    - Walk the optimized `StyleSheet` children in order
//!    - For every `Rule`, `Atrule`, `Declaration` and `Comment`, compute the host content
//!      it stands for, generating selector, params and value text with the engine
//!    - Follow the node's backlink. When it resolves to a host node of the same kind
//!      that no earlier node of this pass has claimed, plan to reuse that instance,
//!      patching its text only where it differs. Otherwise plan a new node, inheriting
//!      the origin's source position when the backlink resolved
//!    - Flatten nested `Block`/`StyleSheet` lists and leave out rules whose selector
//!      and children were both eliminated
//!    - Fold `Raw` siblings into the layout: their text becomes the `before` of the
//!      next planned sibling, or the parent's `after` when nothing follows
//!
//! 2. **Apply**:
//!    - Patch reused nodes, allocate new ones and rebuild every child list bottom-up
//!    - Replace the root's children; nodes left out of the plan end up detached, and
//!      their own child lists are cleared so nothing keeps pointing into them
//!
//! Nothing is written to the host tree before the plan is complete, so a failure while
//! planning leaves the document untouched.
//!
//! Reconciled nodes get compact layout raws: the optimized tree decides the output
//! layout. A comment whose value is still its original `left + text + right` keeps its
//! fields as they were.

use crate::error::BridgeError;
use crate::host::{HostNode, NodeId, NodeKind, Raws, Root, Source};
use crate::optimizer::{
    Atrule, Backlink, Block, Comment, CssNode, Declaration, Engine, Important, Rule, StyleSheet,
};
use std::collections::HashSet;
use std::mem::discriminant;
use tracing::{debug, trace};

/// Rewrites the children of `root` to match `optimized`.
pub fn reconcile<E: Engine + ?Sized>(
    root: &mut Root,
    optimized: &CssNode,
    engine: &E,
) -> Result<(), BridgeError> {
    let CssNode::StyleSheet(sheet) = optimized else {
        return Err(BridgeError::structural(format!(
            "expected a StyleSheet from the optimizer, got {optimized}"
        )));
    };

    let mut planner = Planner {
        root: &*root,
        engine,
        claimed: HashSet::new(),
    };
    let Siblings { planned, layout } = planner.plan_list(&sheet.children)?;

    let root_id = root.id();
    let previous = root.descendants(root_id);
    let mut stats = Stats::default();
    let children = planned
        .into_iter()
        .map(|planned| materialize(root, planned, &mut stats))
        .collect();
    root.set_children(root_id, Some(children));
    let raws = &mut root.node_mut(root_id).raws;
    raws.after = Some(layout);
    raws.semicolon = false;

    for id in previous {
        if !root.is_attached(id) && root.children(id).is_some_and(|nodes| !nodes.is_empty()) {
            stats.cleared += 1;
            root.set_children(id, Some(Vec::new()));
        }
    }

    debug!(
        reused = stats.reused,
        patched = stats.patched,
        created = stats.created,
        cleared = stats.cleared,
        "host tree reconciled"
    );
    Ok(())
}

#[derive(Debug, Default, Clone, Copy)]
struct Stats {
    reused: usize,
    patched: usize,
    created: usize,
    cleared: usize,
}

#[derive(Debug)]
enum Target {
    Reuse(NodeId),
    Create { source: Option<Source> },
}

#[derive(Debug)]
struct Planned {
    target: Target,
    kind: NodeKind,
    raws: Raws,
    children: Option<Vec<Planned>>,
}

/// Planned siblings plus layout text not yet given to a node.
#[derive(Debug, Default)]
struct Siblings {
    planned: Vec<Planned>,
    layout: String,
}

impl Siblings {
    fn push(&mut self, mut planned: Planned) {
        planned.raws.before = Some(std::mem::take(&mut self.layout));
        self.planned.push(planned);
    }
}

struct Planner<'a, E: ?Sized> {
    root: &'a Root,
    engine: &'a E,
    claimed: HashSet<NodeId>,
}

impl<'a, E: Engine + ?Sized> Planner<'a, E> {
    fn plan_list(&mut self, nodes: &[CssNode]) -> Result<Siblings, BridgeError> {
        let mut siblings = Siblings::default();
        for node in nodes {
            self.plan_into(node, &mut siblings)?;
        }
        Ok(siblings)
    }

    fn plan_into(&mut self, node: &CssNode, out: &mut Siblings) -> Result<(), BridgeError> {
        match node {
            CssNode::Rule(rule) => {
                if let Some(planned) = self.plan_rule(rule)? {
                    out.push(planned);
                }
            }
            CssNode::Atrule(at_rule) => out.push(self.plan_at_rule(at_rule)?),
            CssNode::Declaration(decl) => out.push(self.plan_declaration(decl)),
            CssNode::Comment(comment) => out.push(self.plan_comment(comment)),
            CssNode::Block(Block { children, .. })
            | CssNode::StyleSheet(StyleSheet { children, .. }) => {
                for child in children {
                    self.plan_into(child, out)?;
                }
            }
            CssNode::Raw(raw) => {
                trace!(value = raw.value.as_str(), "raw node folded into layout");
                out.layout.push_str(&raw.value);
            }
            other => {
                return Err(BridgeError::structural(format!(
                    "unexpected {other} among block children"
                )));
            }
        }
        Ok(())
    }

    fn plan_rule(&mut self, rule: &Rule) -> Result<Option<Planned>, BridgeError> {
        let selector = self.engine.generate(&rule.prelude);
        let anonymous = selector.is_empty();
        let kind = NodeKind::Rule { selector };
        let target = self.claim(rule.loc, &kind);
        let Siblings { planned, layout } = self.plan_block(&rule.block)?;
        if anonymous && planned.is_empty() {
            trace!("dropping rule with no selector and no content");
            self.release(&target);
            return Ok(None);
        }
        Ok(Some(Planned {
            target,
            kind,
            raws: compact_container(layout),
            children: Some(planned),
        }))
    }

    fn plan_at_rule(&mut self, at_rule: &Atrule) -> Result<Planned, BridgeError> {
        let params = at_rule
            .prelude
            .as_deref()
            .map(|prelude| self.engine.generate(prelude))
            .unwrap_or_default();
        let kind = NodeKind::AtRule {
            name: at_rule.name.clone(),
            params,
        };
        let target = self.claim(at_rule.loc, &kind);
        let (children, layout) = match at_rule.block.as_deref() {
            Some(block) => {
                let Siblings { planned, layout } = self.plan_block(block)?;
                (Some(planned), layout)
            }
            None => (None, String::new()),
        };
        Ok(Planned {
            target,
            kind,
            raws: compact_container(layout),
            children,
        })
    }

    fn plan_declaration(&mut self, decl: &Declaration) -> Planned {
        let value = self.engine.generate(&decl.value);
        let (important, flag) = match &decl.important {
            Important::Normal => (false, None),
            Important::Important => (true, Some("!important".to_string())),
            Important::Hack(flag) => (true, Some(format!("!{flag}"))),
        };
        let raws = Raws {
            before: Some(String::new()),
            between: Some(":".to_string()),
            important: flag,
            ..Raws::default()
        };
        let kind = NodeKind::Decl {
            prop: decl.property.clone(),
            value,
            important,
        };
        Planned {
            target: self.claim(decl.loc, &kind),
            kind,
            raws,
            children: None,
        }
    }

    fn plan_comment(&mut self, comment: &Comment) -> Planned {
        let verbatim = self.origin(comment.loc).and_then(|(_, node)| match &node.kind {
            NodeKind::Comment { text } => {
                let left = node.raws.left.as_deref().unwrap_or("");
                let right = node.raws.right.as_deref().unwrap_or("");
                let unchanged = comment.value.len() == left.len() + text.len() + right.len()
                    && comment.value.starts_with(left)
                    && comment.value[left.len()..].starts_with(text.as_str())
                    && comment.value.ends_with(right);
                unchanged.then(|| (node.kind.clone(), left.to_string(), right.to_string()))
            }
            _ => None,
        });
        let (kind, left, right) = verbatim.unwrap_or_else(|| {
            let kind = NodeKind::Comment {
                text: comment.value.clone(),
            };
            (kind, String::new(), String::new())
        });
        let raws = Raws {
            before: Some(String::new()),
            left: Some(left),
            right: Some(right),
            ..Raws::default()
        };
        Planned {
            target: self.claim(comment.loc, &kind),
            kind,
            raws,
            children: None,
        }
    }

    /// Child plans of a rule or at-rule block.
    fn plan_block(&mut self, block: &CssNode) -> Result<Siblings, BridgeError> {
        let children = block.children().ok_or_else(|| {
            BridgeError::structural(format!("expected a Block, got {block}"))
        })?;
        self.plan_list(children)
    }

    fn origin(&self, loc: Option<Backlink>) -> Option<(NodeId, &'a HostNode)> {
        let root: &'a Root = self.root;
        let id = loc?.node();
        root.get(id).map(|node| (id, node))
    }

    /// Claim the host node behind `loc` for a node of `kind`, if it can carry it.
    ///
    /// Claims happen in document order of the optimized tree, so the first node
    /// linking to an instance gets it.
    fn claim(&mut self, loc: Option<Backlink>, kind: &NodeKind) -> Target {
        let origin = self.origin(loc);
        if let Some((id, node)) = origin {
            let reusable = id != self.root.id()
                && discriminant(&node.kind) == discriminant(kind)
                && !self.claimed.contains(&id);
            if reusable {
                self.claimed.insert(id);
                return Target::Reuse(id);
            }
        }
        Target::Create {
            source: origin.and_then(|(_, node)| node.source),
        }
    }

    fn release(&mut self, target: &Target) {
        if let Target::Reuse(id) = target {
            self.claimed.remove(id);
        }
    }
}

fn compact_container(after: String) -> Raws {
    Raws {
        before: Some(String::new()),
        between: Some(String::new()),
        after: Some(after),
        ..Raws::default()
    }
}

fn materialize(root: &mut Root, planned: Planned, stats: &mut Stats) -> NodeId {
    let Planned {
        target,
        kind,
        raws,
        children,
    } = planned;

    let id = match target {
        Target::Reuse(id) => {
            let node = root.node_mut(id);
            if node.kind == kind {
                stats.reused += 1;
                trace!(node = %id, "reusing unchanged host node");
            } else {
                stats.patched += 1;
                trace!(node = %id, "patching host node");
                node.kind = kind;
            }
            node.raws = raws;
            id
        }
        Target::Create { source } => {
            stats.created += 1;
            trace!(kind = kind.type_name(), "creating host node");
            let id = root.create(kind);
            let node = root.node_mut(id);
            node.raws = raws;
            node.source = source;
            id
        }
    };

    let children = children.map(|list| {
        list.into_iter()
            .map(|child| materialize(root, child, stats))
            .collect()
    });
    root.set_children(id, children);
    id
}
