use crate::client::StoreClient;
use crate::errors::Result;
use crate::path::{join_relative, NodePath};

/// Lazy pre-order walk over every descendant of a base node
///
/// Yields each descendant's path relative to the base (`b`, `b/c`, ...).
/// A node is yielded before any of its descendants and siblings keep the
/// order `list_children` returned them in. Children of a node are only
/// listed once the caller asks for the item after it, so an abandoned walk
/// issues no further store calls.
///
/// The first error ends the walk: it is yielded once and every later call
/// returns `None`.
pub struct Descendants<'a, C: StoreClient + ?Sized> {
    client: &'a C,
    base: NodePath,
    started: bool,
    finished: bool,
    /// Yielded node whose children have not been listed yet
    unexpanded: Option<(NodePath, String)>,
    /// Nodes waiting to be yielded; top of stack is next
    stack: Vec<(NodePath, String)>,
}

impl<'a, C: StoreClient + ?Sized> Descendants<'a, C> {
    /// Start a walk below `base`
    pub fn new(client: &'a C, base: NodePath) -> Self {
        Self {
            client,
            base,
            started: false,
            finished: false,
            unexpanded: None,
            stack: Vec::new(),
        }
    }

    /// Discard progress and walk again from the base
    pub fn restart(&mut self) {
        self.started = false;
        self.finished = false;
        self.unexpanded = None;
        self.stack.clear();
    }

    fn expand(&mut self, node: &NodePath, relative: &str) -> Result<()> {
        let names = self.client.list_children(node)?;
        let mut children = Vec::with_capacity(names.len());
        for name in names {
            let child = node.join(&name)?;
            children.push((child, join_relative(relative, &name)));
        }
        // Reversed so the first child is popped first
        self.stack.extend(children.into_iter().rev());
        Ok(())
    }

    fn advance(&mut self) -> Result<Option<String>> {
        if !self.started {
            self.started = true;
            let base = self.base.clone();
            self.expand(&base, "")?;
        }
        if let Some((node, relative)) = self.unexpanded.take() {
            self.expand(&node, &relative)?;
        }

        Ok(self.stack.pop().map(|(node, relative)| {
            self.unexpanded = Some((node, relative.clone()));
            relative
        }))
    }
}

impl<C: StoreClient + ?Sized> Iterator for Descendants<'_, C> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.advance() {
            Ok(Some(relative)) => Some(Ok(relative)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

/// Every descendant of `base`, relative to it, in pre-order
///
/// Fully materializes a [`Descendants`] walk. A leaf yields an empty list.
///
/// # Errors
///
/// The first `list_children` failure, for `base` or any descendant, fails
/// the whole call; no partial result is returned.
pub fn children_recursive<C: StoreClient + ?Sized>(
    client: &C,
    base: &NodePath,
) -> Result<Vec<String>> {
    Descendants::new(client, base.clone()).collect()
}
