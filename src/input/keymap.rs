// src/input/keymap.rs
use std::collections::HashMap;

use log::debug;

use super::key::Key;
use crate::editor::Mode;

/// Command every raw key is routed to when no mode binding claims it.
pub const TAKE_KEY_COMMAND: &str = "vim-take-key";

/// Host issued id for a registered multi-key sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceHandle(pub usize);

/// What a binding is installed under in the host's live routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKey {
    Key(Key),
    Sequence(SequenceHandle),
}

/// A routed command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub args: Vec<String>,
}

/// The host's key routing table. Sequence handles are a scarce resource:
/// every `add_sequence` is paired with a `delete_sequence` on teardown.
pub trait KeyRouter {
    fn add_sequence(&mut self, keys: &[Key]) -> SequenceHandle;
    fn delete_sequence(&mut self, handle: SequenceHandle);
    fn bind(&mut self, route: RouteKey, command: &str, args: &[String]);
    fn unbind(&mut self, route: RouteKey);
}

/// Route a single key to the dispatcher.
pub fn route_to_dispatcher<R: KeyRouter + ?Sized>(router: &mut R, key: Key) {
    router.bind(RouteKey::Key(key), TAKE_KEY_COMMAND, &[key.to_string()]);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    keys: Vec<Key>,
    command: String,
    args: Vec<String>,
    route: Option<RouteKey>,
}

impl KeyBinding {
    pub fn new(keys: &[Key], command: &str, args: &[String]) -> Self {
        Self {
            keys: keys.to_vec(),
            command: command.to_string(),
            args: args.to_vec(),
            route: None,
        }
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Where the binding is live, if its table is active
    pub fn route(&self) -> Option<RouteKey> {
        self.route
    }

    fn activate<R: KeyRouter + ?Sized>(&mut self, router: &mut R) {
        let route = if self.keys.len() > 1 {
            RouteKey::Sequence(router.add_sequence(&self.keys))
        } else {
            RouteKey::Key(self.keys[0])
        };
        router.bind(route, &self.command, &self.args);
        self.route = Some(route);
    }

    fn deactivate<R: KeyRouter + ?Sized>(&mut self, router: &mut R) {
        let Some(route) = self.route.take() else {
            return;
        };
        router.unbind(route);
        match route {
            RouteKey::Sequence(handle) => router.delete_sequence(handle),
            RouteKey::Key(key) if key.is_raw() => route_to_dispatcher(router, key),
            RouteKey::Key(_) => {}
        }
    }
}

/// The bindings of one mode, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingTable {
    bindings: Vec<KeyBinding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyBinding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn get(&self, keys: &[Key]) -> Option<&KeyBinding> {
        self.bindings.iter().find(|b| b.keys == keys)
    }

    fn position(&self, keys: &[Key]) -> Option<usize> {
        self.bindings.iter().position(|b| b.keys == keys)
    }

    /// Append a binding. An existing binding for the same sequence is
    /// replaced, so the last write wins.
    pub fn insert(&mut self, binding: KeyBinding) {
        if let Some(i) = self.position(&binding.keys) {
            self.bindings.remove(i);
        }
        self.bindings.push(binding);
    }

    /// Remove the binding with exactly this sequence.
    pub fn remove(&mut self, keys: &[Key]) -> Option<KeyBinding> {
        self.position(keys).map(|i| self.bindings.remove(i))
    }

    pub fn activate<R: KeyRouter + ?Sized>(&mut self, router: &mut R) {
        for binding in &mut self.bindings {
            binding.activate(router);
        }
    }

    pub fn deactivate<R: KeyRouter + ?Sized>(&mut self, router: &mut R) {
        for binding in &mut self.bindings {
            binding.deactivate(router);
        }
    }
}

/// One binding table per mode.
#[derive(Debug, Clone, Default)]
pub struct ModeBindings {
    tables: [BindingTable; 4],
}

impl ModeBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, mode: Mode) -> &BindingTable {
        &self.tables[mode.index()]
    }

    pub fn table_mut(&mut self, mode: Mode) -> &mut BindingTable {
        &mut self.tables[mode.index()]
    }

    /// Mutate a table. When the table is live its routes are torn down
    /// completely before the edit and reinstalled after it.
    pub fn edit<R, F, T>(&mut self, mode: Mode, live: bool, router: &mut R, f: F) -> T
    where
        R: KeyRouter + ?Sized,
        F: FnOnce(&mut BindingTable) -> T,
    {
        let table = self.table_mut(mode);
        if live {
            table.deactivate(router);
        }
        let result = f(table);
        if live {
            table.activate(router);
            debug!("reinstalled {} {} binding(s)", table.len(), mode.name());
        }
        result
    }
}

/// In-memory routing table. Resolves typed keys to invocations, holding keys
/// back while they are a strict prefix of a registered sequence.
#[derive(Debug, Default)]
pub struct MemoryRouter {
    routes: HashMap<RouteKey, Invocation>,
    sequences: Vec<Option<Vec<Key>>>,
    pending: Vec<Key>,
}

impl MemoryRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self, route: RouteKey) -> Option<&Invocation> {
        self.routes.get(&route)
    }

    pub fn route_for_key(&self, key: Key) -> Option<&Invocation> {
        self.route(RouteKey::Key(key))
    }

    /// The live route of a registered sequence
    pub fn route_for_sequence(&self, keys: &[Key]) -> Option<&Invocation> {
        self.sequence_handle(keys)
            .and_then(|handle| self.route(RouteKey::Sequence(handle)))
    }

    pub fn live_sequences(&self) -> usize {
        self.sequences.iter().flatten().count()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    fn sequence_handle(&self, keys: &[Key]) -> Option<SequenceHandle> {
        self.sequences
            .iter()
            .position(|slot| slot.as_deref() == Some(keys))
            .map(SequenceHandle)
    }

    fn is_sequence_prefix(&self, keys: &[Key]) -> bool {
        self.sequences
            .iter()
            .flatten()
            .any(|seq| seq.len() > keys.len() && seq.starts_with(keys))
    }

    fn invocation_for_key(&self, key: Key) -> Invocation {
        // Keys nobody routed still reach the dispatcher
        self.route_for_key(key).cloned().unwrap_or_else(|| Invocation {
            command: TAKE_KEY_COMMAND.to_string(),
            args: vec![key.to_string()],
        })
    }

    pub fn resolve(&mut self, key: Key) -> Vec<Invocation> {
        self.pending.push(key);
        let mut out = Vec::new();

        while !self.pending.is_empty() {
            if let Some(handle) = self.sequence_handle(&self.pending) {
                self.pending.clear();
                out.extend(self.route(RouteKey::Sequence(handle)).cloned());
                break;
            }
            if self.is_sequence_prefix(&self.pending) {
                break;
            }
            let first = self.pending.remove(0);
            out.push(self.invocation_for_key(first));
        }

        out
    }
}

impl KeyRouter for MemoryRouter {
    fn add_sequence(&mut self, keys: &[Key]) -> SequenceHandle {
        match self.sequences.iter().position(Option::is_none) {
            Some(slot) => {
                self.sequences[slot] = Some(keys.to_vec());
                SequenceHandle(slot)
            }
            None => {
                self.sequences.push(Some(keys.to_vec()));
                SequenceHandle(self.sequences.len() - 1)
            }
        }
    }

    fn delete_sequence(&mut self, handle: SequenceHandle) {
        if let Some(slot) = self.sequences.get_mut(handle.0) {
            *slot = None;
        }
    }

    fn bind(&mut self, route: RouteKey, command: &str, args: &[String]) {
        self.routes.insert(
            route,
            Invocation {
                command: command.to_string(),
                args: args.to_vec(),
            },
        );
    }

    fn unbind(&mut self, route: RouteKey) {
        self.routes.remove(&route);
    }
}
