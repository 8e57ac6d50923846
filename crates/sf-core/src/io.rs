use std::collections::BTreeMap;

use crate::attribute::Attribute;
use crate::entity::Entity;
use crate::level::Level;

/// Target token naming the entity that owns the output.
pub const TARGET_THIS: &str = "!this";
/// Alias of [`TARGET_THIS`].
pub const TARGET_SELF: &str = "!self";
/// Target token naming the entity that started the chain.
pub const TARGET_INSTIGATOR: &str = "!instigator";

/// One output connection: when `trigger` fires, call `input` on `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    /// Output name, or a `*` pattern over output names.
    pub trigger: String,
    /// Target entity name or token.
    pub target: String,
    /// Input to call on the target.
    pub input: String,
    /// Arguments passed to the input.
    pub args: Vec<Attribute>,
    /// Ticks to wait before calling the input.
    pub delay: u32,
}

impl Output {
    /// A connection with no arguments and no delay.
    pub fn new(
        trigger: impl Into<String>,
        target: impl Into<String>,
        input: impl Into<String>,
    ) -> Self {
        Self {
            trigger: trigger.into(),
            target: target.into(),
            input: input.into(),
            args: Vec::new(),
            delay: 0,
        }
    }

    /// Builder-style delay.
    pub fn with_delay(mut self, ticks: u32) -> Self {
        self.delay = ticks;
        self
    }

    /// Builder-style argument.
    pub fn with_arg(mut self, arg: impl Into<Attribute>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Whether this connection fires for `event`.
    pub fn matches(&self, event: &str) -> bool {
        glob_match(&self.trigger, event)
    }
}

/// `*` matches any run of characters; everything else matches literally.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let Some((head, rest)) = pattern.split_once('*') else {
        return pattern == text;
    };
    let Some(mut remaining) = text.strip_prefix(head) else {
        return false;
    };
    let mut parts = rest.split('*').peekable();
    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            return remaining.ends_with(part);
        }
        match remaining.find(part) {
            Some(at) => remaining = &remaining[at + part.len()..],
            None => return false,
        }
    }
    true
}

/// Resolve a connection's target from the point of view of `source`.
///
/// `!this`/`!self` name the source and `!instigator` the chain's instigator;
/// any other text has `{this}` replaced by the source's name and is looked up
/// in the level.
pub fn resolve_target<'a>(
    level: &'a Level,
    target: &str,
    source: &'a Entity,
    instigator: &'a Entity,
) -> Option<&'a Entity> {
    match target {
        TARGET_THIS | TARGET_SELF => Some(source),
        TARGET_INSTIGATOR => Some(instigator),
        name if name.starts_with('!') => {
            log::error!("unknown target keyword \"{name}\" on entity \"{}\"", source.name());
            None
        }
        name => level.entity(&name.replace("{this}", source.name())),
    }
}

// ---------------------------------------------------------------------------
// Static wiring graph
// ---------------------------------------------------------------------------

/// A connection whose target does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingOutput {
    /// Entity owning the output.
    pub source: String,
    /// Trigger of the connection.
    pub trigger: String,
    /// Unresolved target text.
    pub target: String,
}

/// A connection calling an input the target does not declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndeclaredInput {
    /// Entity owning the output.
    pub source: String,
    /// Target entity.
    pub target: String,
    /// Input that was called.
    pub input: String,
}

/// The entity-to-entity graph formed by output connections.
///
/// `!instigator` targets depend on the runtime chain and are left out.
#[derive(Debug, Clone, Default)]
pub struct WiringGraph {
    names: Vec<String>,
    edges: BTreeMap<usize, Vec<usize>>,
    dangling: Vec<DanglingOutput>,
    undeclared: Vec<UndeclaredInput>,
}

impl WiringGraph {
    /// Build the graph of a level.
    pub fn build(level: &Level) -> Self {
        let names: Vec<String> = level.entities().map(|e| e.name().to_string()).collect();
        let index_of = |name: &str| names.iter().position(|n| n == name);
        let mut graph = WiringGraph::default();

        for (from, source) in level.entities().enumerate() {
            for output in source.outputs() {
                if output.target == TARGET_INSTIGATOR {
                    continue;
                }
                let Some(target) = resolve_target(level, &output.target, source, source) else {
                    graph.dangling.push(DanglingOutput {
                        source: source.name().to_string(),
                        trigger: output.trigger.clone(),
                        target: output.target.clone(),
                    });
                    continue;
                };
                let declared = target.kind().inputs().iter().any(|i| i.name == output.input);
                if !declared {
                    graph.undeclared.push(UndeclaredInput {
                        source: source.name().to_string(),
                        target: target.name().to_string(),
                        input: output.input.clone(),
                    });
                }
                if let Some(to) = index_of(target.name()) {
                    let targets = graph.edges.entry(from).or_default();
                    if !targets.contains(&to) {
                        targets.push(to);
                    }
                }
            }
        }
        graph.names = names;
        graph
    }

    /// Connections whose targets do not resolve.
    pub fn dangling(&self) -> &[DanglingOutput] {
        &self.dangling
    }

    /// Connections calling undeclared inputs.
    pub fn undeclared_inputs(&self) -> &[UndeclaredInput] {
        &self.undeclared
    }

    /// Every cycle, as entity names in stack order with the first name
    /// repeated at the end.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut tarjan = Tarjan::new(self.names.len());
        for v in 0..self.names.len() {
            if tarjan.index[v].is_none() {
                tarjan.visit(v, &self.edges);
            }
        }
        let mut cycles: Vec<Vec<String>> = tarjan
            .components
            .into_iter()
            .filter(|c| c.len() > 1 || self.edges.get(&c[0]).is_some_and(|t| t.contains(&c[0])))
            .map(|mut component| {
                component.sort_unstable();
                let mut names: Vec<String> =
                    component.iter().map(|&i| self.names[i].clone()).collect();
                names.push(names[0].clone());
                names
            })
            .collect();
        cycles.sort();
        cycles
    }
}

struct Tarjan {
    counter: usize,
    index: Vec<Option<usize>>,
    low: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    components: Vec<Vec<usize>>,
}

impl Tarjan {
    fn new(n: usize) -> Self {
        Self {
            counter: 0,
            index: vec![None; n],
            low: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            components: Vec::new(),
        }
    }

    fn visit(&mut self, v: usize, edges: &BTreeMap<usize, Vec<usize>>) {
        self.index[v] = Some(self.counter);
        self.low[v] = self.counter;
        self.counter += 1;
        self.stack.push(v);
        self.on_stack[v] = true;

        for &w in edges.get(&v).map(Vec::as_slice).unwrap_or_default() {
            match self.index[w] {
                None => {
                    self.visit(w, edges);
                    self.low[v] = self.low[v].min(self.low[w]);
                }
                Some(index) if self.on_stack[w] => self.low[v] = self.low[v].min(index),
                Some(_) => {}
            }
        }

        if Some(self.low[v]) == self.index[v] {
            let mut component = Vec::new();
            while let Some(w) = self.stack.pop() {
                self.on_stack[w] = false;
                component.push(w);
                if w == v {
                    break;
                }
            }
            self.components.push(component);
        }
    }
}
