// src/editor/mod.rs
pub mod buffer;
mod error;
pub mod host;
pub mod mode;

// Re-export the types we need publicly
pub use buffer::MemoryHost;
pub use error::EngineError;
pub use host::{Host, HostAction, Position, Selection, SelectionKind};
pub use mode::{Mode, ModeIndicator};

use log::{debug, info, warn};

use crate::config::{BindingConfig, EngineConfig};
use crate::input::command_line::{CommandLine, PROMPT};
use crate::input::key::{Key, MAX_SEQ_LEN};
use crate::input::keymap::{
    route_to_dispatcher, BindingTable, KeyBinding, KeyRouter, ModeBindings, TAKE_KEY_COMMAND,
};
use crate::input::repeat::{Origin, RepeatRecorder};
use crate::input::till::TillMotion;

/// The modal key engine. Owns the host it drives and the router its
/// bindings are installed into.
pub struct Engine<H, R> {
    pub(crate) host: H,
    pub(crate) router: R,
    pub(crate) config: EngineConfig,
    pub(crate) mode: Mode,
    pub(crate) bindings: ModeBindings,
    pub(crate) repeat: RepeatRecorder,
    pub(crate) till: TillMotion,
    pub(crate) command_line: CommandLine,
    /// Pending count prefix for motions
    pub(crate) count: Option<usize>,
    undo_baseline: Option<usize>,
    restore_cursor_line: bool,
}

impl<H: Host, R: KeyRouter> Engine<H, R> {
    pub fn new(host: H, router: R, config: EngineConfig) -> Self {
        let mut engine = Self {
            host,
            router,
            config,
            mode: Mode::Normal,
            bindings: ModeBindings::new(),
            repeat: RepeatRecorder::new(),
            till: TillMotion::new(),
            command_line: CommandLine::new(),
            count: None,
            undo_baseline: None,
            restore_cursor_line: false,
        };

        for key in Key::raw_keys() {
            route_to_dispatcher(&mut engine.router, key);
        }

        let configured = engine.config.bindings.clone();
        for binding in &configured {
            if let Err(e) = engine.bind_from_config(binding) {
                warn!("skipping {} binding '{}': {}", binding.mode, binding.keys, e);
            }
        }

        engine.transition(Mode::Normal, false, false);
        engine
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut R {
        &mut self.router
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn bindings(&self, mode: Mode) -> &BindingTable {
        self.bindings.table(mode)
    }

    pub fn repeat_keys(&self) -> &[Key] {
        self.repeat.keys()
    }

    pub fn till(&self) -> &TillMotion {
        &self.till
    }

    pub fn command_line(&self) -> &CommandLine {
        &self.command_line
    }

    pub fn pending_count(&self) -> Option<usize> {
        self.count
    }

    /// Leave the current mode and enter `new_mode`. `by_line` makes Delete
    /// and Yank select whole lines; `cancel` drops the pending selection
    /// instead of acting on it.
    pub fn transition(&mut self, new_mode: Mode, by_line: bool, cancel: bool) {
        let old_mode = self.mode;
        debug!("mode {} -> {} (by_line: {}, cancel: {})", old_mode, new_mode, by_line, cancel);

        match old_mode {
            Mode::Normal => {}
            Mode::Insert => self.exit_insert(),
            Mode::Delete => self.exit_selecting(cancel, true),
            Mode::Yank => self.exit_selecting(cancel, false),
        }

        self.bindings.table_mut(old_mode).deactivate(&mut self.router);
        self.mode = new_mode;
        self.bindings.table_mut(new_mode).activate(&mut self.router);

        let indicator = ModeIndicator {
            name: new_mode.display_name().to_string(),
            attrs: self.config.mode_attrs.for_mode(new_mode).to_string(),
        };
        self.host.set_mode_indicator(&indicator);

        match new_mode {
            Mode::Normal => self.host.set_search_cursor_move(false),
            Mode::Insert => self.enter_insert(),
            Mode::Delete | Mode::Yank => {
                self.host.set_search_cursor_move(true);
                self.host.execute(if by_line {
                    HostAction::SelectLines
                } else {
                    HostAction::Select
                });
            }
        }
    }

    fn enter_insert(&mut self) {
        self.undo_baseline = self.host.undo_record_count();
        if self.config.insert_no_cursor_line && self.host.cursor_line() {
            self.host.set_cursor_line(false);
            self.restore_cursor_line = true;
        }
    }

    fn exit_insert(&mut self) {
        if let Some(baseline) = self.undo_baseline.take() {
            // Fold the session's edits into a single undo record
            while let Some(count) = self.host.undo_record_count() {
                if count <= baseline + 1 {
                    break;
                }
                self.host.merge_undo_records();
                if self.host.undo_record_count() >= Some(count) {
                    warn!("host did not merge undo records, giving up");
                    break;
                }
            }
        }
        if std::mem::take(&mut self.restore_cursor_line) {
            self.host.set_cursor_line(true);
        }
    }

    fn exit_selecting(&mut self, cancel: bool, delete: bool) {
        if !cancel {
            if let Some(selection) = self.host.selection() {
                if selection.is_collapsed() {
                    self.host.execute(HostAction::SelectLines);
                }
                self.host.execute(HostAction::YankSelection { deletion: delete });
                if delete {
                    self.host.execute(HostAction::DeleteBack);
                }
            }
        }
        self.host.execute(HostAction::SelectOff);
    }

    /// Add a binding to `mode`. A binding for the same sequence is replaced.
    /// Empty sequences are ignored.
    pub fn bind(
        &mut self,
        mode: Mode,
        keys: &[Key],
        command: &str,
        args: &[String],
    ) -> Result<(), EngineError> {
        if keys.is_empty() {
            return Ok(());
        }
        check_length(keys)?;

        let live = mode == self.mode;
        let binding = KeyBinding::new(keys, command, args);
        self.bindings
            .edit(mode, live, &mut self.router, |table| table.insert(binding));
        debug!("bound {} '{}' to {}", mode.name(), Key::sequence_to_string(keys), command);
        Ok(())
    }

    /// Remove the binding for exactly `keys` from `mode`. Missing bindings
    /// are not an error.
    pub fn unbind(&mut self, mode: Mode, keys: &[Key]) -> Result<(), EngineError> {
        if keys.is_empty() {
            return Ok(());
        }
        check_length(keys)?;

        if self.bindings.table(mode).get(keys).is_none() {
            return Ok(());
        }
        let live = mode == self.mode;
        self.bindings.edit(mode, live, &mut self.router, |table| {
            table.remove(keys);
        });
        debug!("unbound {} '{}'", mode.name(), Key::sequence_to_string(keys));
        Ok(())
    }

    fn bind_from_config(&mut self, binding: &BindingConfig) -> Result<(), EngineError> {
        let mode: Mode = binding.mode.parse()?;
        let keys = parse_keys(&binding.keys)?;
        self.bind(mode, &keys, &binding.command, &binding.args)
    }

    /// Run a command by name. Commands the engine does not own go to the host.
    /// Errors are reported to the host as well as returned.
    pub fn run_command(&mut self, name: &str, args: &[String]) -> Result<(), EngineError> {
        let result = match name {
            TAKE_KEY_COMMAND => self.cmd_take_key(args),
            "vim-bind" => self.cmd_bind(args),
            "vim-unbind" => self.cmd_unbind(args),
            "vim-exit-insert" => {
                self.repeat.push(Key::Ctrl('c'), Origin::Typed);
                self.transition(Mode::Normal, false, false);
                Ok(())
            }
            "vim-command" => self.cmd_command_line(args),
            "w" | "W" => {
                self.write(args);
                Ok(())
            }
            "q" | "Q" => {
                self.quit();
                Ok(())
            }
            "wq" | "Wq" => {
                self.write(args);
                self.quit();
                Ok(())
            }
            _ => {
                self.host.run_command(name, args);
                Ok(())
            }
        };

        if let Err(e) = &result {
            warn!("{}: {}", name, e);
            self.host.report(&format!("[{}] {}", name, e));
        }
        result
    }

    fn cmd_take_key(&mut self, args: &[String]) -> Result<(), EngineError> {
        let [token] = args else {
            return Err(EngineError::WrongArgCount {
                expected: 1,
                got: args.len(),
            });
        };
        let key: Key = token.parse()?;
        self.take_key(key);
        Ok(())
    }

    fn cmd_bind(&mut self, args: &[String]) -> Result<(), EngineError> {
        let mode: Mode = args.first().ok_or(EngineError::MissingArgument("mode"))?.parse()?;
        let keys = args.get(1).ok_or(EngineError::MissingArgument("keys"))?;
        let command = args.get(2).ok_or(EngineError::MissingArgument("command"))?;
        let keys = non_empty(parse_keys(keys)?)?;
        self.bind(mode, &keys, command, &args[3..])
    }

    fn cmd_unbind(&mut self, args: &[String]) -> Result<(), EngineError> {
        let [mode, keys] = args else {
            return Err(EngineError::WrongArgCount {
                expected: 2,
                got: args.len(),
            });
        };
        let mode: Mode = mode.parse()?;
        let keys = non_empty(parse_keys(keys)?)?;
        self.unbind(mode, &keys)
    }

    fn cmd_command_line(&mut self, args: &[String]) -> Result<(), EngineError> {
        if !args.is_empty() {
            return Err(EngineError::UnexpectedArguments);
        }
        self.open_command_line();
        Ok(())
    }

    fn write(&mut self, args: &[String]) {
        self.host.execute(HostAction::WriteBuffer(args.to_vec()));
    }

    /// Close the active frame, or quit when it is the only one and fills the
    /// terminal.
    fn quit(&mut self) {
        let last_frame = match self.host.frame_count() {
            0 => true,
            1 => self.host.active_frame_fills_terminal(),
            _ => false,
        };
        self.host.execute(if last_frame {
            HostAction::Quit
        } else {
            HostAction::FrameDelete
        });
    }

    /// Execute a submitted command line.
    pub(crate) fn execute_line(&mut self, line: &str) {
        let Some(words) = shlex::split(line) else {
            let e = EngineError::MalformedCommand(line.to_string());
            warn!("{}", e);
            self.host.report(&e.to_string());
            return;
        };
        let Some((name, args)) = words.split_first() else {
            return;
        };
        info!("command line: {}", line);
        // Errors are already reported
        let _ = self.run_command(name, args);
    }

    pub(crate) fn open_command_line(&mut self) {
        self.command_line.start();
        self.host.set_prompt(Some(PROMPT));
        self.host.set_command_text("");
    }

    pub(crate) fn report_unhandled(&mut self, key: Key) {
        warn!("[{}] unhandled key {}", self.mode.display_name(), key);
        self.host
            .report(&format!("[{}] unhandled key {}", self.mode.display_name(), key));
    }
}

fn check_length(keys: &[Key]) -> Result<(), EngineError> {
    if keys.len() > MAX_SEQ_LEN {
        return Err(EngineError::SequenceTooLong(Key::sequence_to_string(keys)));
    }
    Ok(())
}

fn parse_keys(s: &str) -> Result<Vec<Key>, EngineError> {
    let keys = Key::parse_sequence(s)?;
    if keys.len() > MAX_SEQ_LEN {
        return Err(EngineError::SequenceTooLong(s.to_string()));
    }
    Ok(keys)
}

fn non_empty(keys: Vec<Key>) -> Result<Vec<Key>, EngineError> {
    if keys.is_empty() {
        return Err(EngineError::EmptySequence);
    }
    Ok(keys)
}
