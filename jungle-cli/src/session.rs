//! The interactive loop: read a command, apply it to the live game, report back.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use jungle_core::{rules, Coord, Game, PlayerNames, Side};
use log::{info, warn};

use crate::command::{Command, HELP};
use crate::record;
use crate::snapshot_file;
use crate::view;

/// Default pause between replayed moves.
pub const REPLAY_DELAY: Duration = Duration::from_millis(1000);

/// Granularity of the replay pause, so Ctrl-C is noticed promptly.
const POLL: Duration = Duration::from_millis(50);

/// Ctrl-C plumbing shared with the signal handler.
///
/// A replay listens for the signal; outside a replay nothing does, and the handler should
/// end the process instead.
#[derive(Clone, Default)]
pub struct Interrupt {
    replaying: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
}

impl Interrupt {
    /// Called from the signal handler. Returns false when no replay is listening.
    pub fn trigger(&self) -> bool {
        if self.replaying.load(Ordering::SeqCst) {
            self.stop.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    fn begin(&self) {
        self.stop.store(false, Ordering::SeqCst);
        self.replaying.store(true, Ordering::SeqCst);
    }

    fn end(&self) {
        self.replaying.store(false, Ordering::SeqCst);
    }

    fn requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Session<W: Write> {
    game: Game,
    out: W,
    replay_delay: Duration,
    interrupt: Interrupt,
}

impl<W: Write> Session<W> {
    pub fn new(game: Game, out: W) -> Self {
        Session {
            game,
            out,
            replay_delay: REPLAY_DELAY,
            interrupt: Interrupt::default(),
        }
    }

    pub fn with_replay_delay(mut self, delay: Duration) -> Self {
        self.replay_delay = delay;
        self
    }

    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    /// Print the command list.
    pub fn help(&mut self) -> io::Result<()> {
        writeln!(self.out, "\n{}\n", HELP)
    }

    /// Board, status, then the input prompt.
    pub fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "{}", view::render_board(self.game.board()))?;
        match self.game.winner() {
            Some(winner) => self.announce_winner(winner)?,
            None => write!(self.out, "{}", view::render_status(&self.game))?,
        }
        writeln!(self.out, "Enter your command:")?;
        self.out.flush()
    }

    /// Prompt and execute until `exit` or end of input.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> io::Result<()> {
        let mut line = String::new();
        loop {
            self.prompt()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Ok(());
            }
            if self.handle_line(&line)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    pub fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        match line.parse::<Command>() {
            Ok(command) => self.execute(command),
            Err(err) => {
                writeln!(self.out, "Invalid command: {}. Type 'help' for commands.", err)?;
                Ok(Flow::Continue)
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::Move { from, to } => self.play(from, to)?,
            Command::Undo => match self.game.undo_move() {
                Ok(_) => writeln!(self.out, "Move undone")?,
                Err(_) => writeln!(self.out, "Cannot undo - no more moves to undo")?,
            },
            Command::New => {
                self.game.reset();
                writeln!(self.out, "New game started!")?;
            }
            Command::Save(path) => match snapshot_file::save(&path, &self.game) {
                Ok(_) => writeln!(self.out, "Game saved to {}", path.display())?,
                Err(err) => {
                    warn!("save to {} failed: {}", path.display(), err);
                    writeln!(self.out, "Failed to save game: {}", err)?;
                }
            },
            Command::Load(path) => match snapshot_file::load(&path) {
                Ok(game) => {
                    self.game = game;
                    writeln!(self.out, "Game loaded successfully")?;
                }
                Err(err) => {
                    warn!("load from {} failed: {}", path.display(), err);
                    writeln!(self.out, "Failed to load game: {}", err)?;
                }
            },
            Command::Record(path) => match record::save(&path, &self.game) {
                Ok(()) => writeln!(self.out, "Record saved to {}", path.display())?,
                Err(err) => {
                    warn!("record to {} failed: {}", path.display(), err);
                    writeln!(self.out, "Failed to save record: {}", err)?;
                }
            },
            Command::Replay(path) => self.replay(&path)?,
            Command::Moves(at) => self.list_moves(at)?,
            Command::Help => self.help()?,
            Command::Exit => {
                writeln!(self.out, "Game ended by player.")?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    fn play(&mut self, from: Coord, to: Coord) -> io::Result<()> {
        match self.game.make_move(from, to) {
            Ok(record) => {
                if let Some(victim) = record.captured {
                    writeln!(self.out, "{} captured {}", record.piece, victim)?;
                }
                Ok(())
            }
            Err(err) => writeln!(self.out, "Invalid move: {}", err),
        }
    }

    fn announce_winner(&mut self, winner: Side) -> io::Result<()> {
        writeln!(self.out, "Game over! Winner: {}", self.game.names().get(winner))
    }

    fn list_moves(&mut self, at: Coord) -> io::Result<()> {
        let Some(piece) = self.game.board().piece_at(at) else {
            return writeln!(self.out, "No piece at {}", at);
        };
        let targets = rules::legal_destinations(self.game.board(), at);
        if targets.is_empty() {
            return writeln!(self.out, "{} at {} has no legal moves", piece, at);
        }
        let list: Vec<String> = targets.iter().map(Coord::to_string).collect();
        writeln!(self.out, "{} at {} can move to: {}", piece, at, list.join(" "))
    }

    /// Play a move log back on a fresh game. The live game is not touched.
    fn replay(&mut self, path: &Path) -> io::Result<()> {
        let log = match record::load(path) {
            Ok(log) => log,
            Err(err) => {
                warn!("replay of {} failed: {}", path.display(), err);
                return writeln!(self.out, "Failed to read record: {}", err);
            }
        };
        if log.moves.is_empty() {
            return writeln!(self.out, "No moves found in record");
        }

        info!("replaying {} moves from {}", log.moves.len(), path.display());
        let mut game = Game::new().with_names(log.names);
        writeln!(self.out, "Starting replay...")?;

        self.interrupt.begin();
        let result = self.play_back(&mut game, &log.moves);
        self.interrupt.end();
        result
    }

    fn play_back(&mut self, game: &mut Game, moves: &[(Coord, Coord)]) -> io::Result<()> {
        for (index, &(from, to)) in moves.iter().enumerate() {
            if self.interrupt.requested() {
                return writeln!(self.out, "Replay interrupted");
            }
            write!(self.out, "{}", view::render_board(game.board()))?;
            writeln!(self.out, "Current player: {}", game.names().get(game.to_move()))?;
            writeln!(
                self.out,
                "Executing: {} {} {} {}",
                from.row, from.col, to.row, to.col
            )?;
            self.out.flush()?;

            if let Err(err) = game.make_move(from, to) {
                return writeln!(self.out, "Replay stopped at move {}: {}", index + 1, err);
            }
            self.pause();
        }

        write!(self.out, "{}", view::render_board(game.board()))?;
        if let Some(winner) = game.winner() {
            writeln!(self.out, "Game over! Winner: {}", game.names().get(winner))?;
        }
        writeln!(self.out, "Replay finished")
    }

    fn pause(&self) {
        let deadline = Instant::now() + self.replay_delay;
        while !self.interrupt.requested() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep((deadline - now).min(POLL));
        }
    }
}

/// Ask for both names on `out`, reading answers from `input`. Empty answers keep `current`.
pub fn ask_names<R: BufRead, W: Write>(
    mut input: R,
    mut out: W,
    current: &PlayerNames,
) -> io::Result<PlayerNames> {
    let mut names = current.clone();
    for (label, slot) in [("Player 1", &mut names.red), ("Player 2", &mut names.blue)] {
        writeln!(out, "Enter name for {} (leave empty for default):", label)?;
        out.flush()?;
        let mut line = String::new();
        input.read_line(&mut line)?;
        let answer = line.trim();
        if !answer.is_empty() {
            *slot = answer.to_string();
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jungle_core::{Board, Piece, Species};

    fn at(row: i32, col: i32) -> Coord {
        Coord::new(row, col)
    }

    fn session(game: Game) -> Session<Vec<u8>> {
        Session::new(game, Vec::new()).with_replay_delay(Duration::ZERO)
    }

    fn output(session: Session<Vec<u8>>) -> String {
        String::from_utf8(session.into_output()).unwrap()
    }

    #[test]
    fn test_move_and_undo() {
        let mut s = session(Game::new());
        assert_eq!(s.handle_line("2 0 3 0").unwrap(), Flow::Continue);
        assert_eq!(s.game().to_move(), Side::Blue);
        s.handle_line("undo").unwrap();
        assert_eq!(s.game().to_move(), Side::Red);
        s.handle_line("undo").unwrap();

        let text = output(s);
        assert!(text.contains("Move undone"));
        assert!(text.contains("Cannot undo - no more moves to undo"));
    }

    #[test]
    fn test_invalid_input_reported() {
        let mut s = session(Game::new());
        s.handle_line("2 0 3").unwrap();
        s.handle_line("6 6 5 6").unwrap();
        s.handle_line("dance").unwrap();
        assert_eq!(s.game().to_move(), Side::Red);

        let text = output(s);
        assert!(text.contains("Invalid command: 'move' takes 4 numbers, got 3"));
        assert!(text.contains("Invalid move: it is Red's turn, not Blue's"));
        assert!(text.contains("Invalid command: unknown command 'dance'"));
    }

    #[test]
    fn test_capture_reported_and_game_over() {
        let mut game = Game::from_board(Board::empty(), Side::Red);
        game.board_mut()
            .place(at(6, 3), Piece::new(Species::Lion, Side::Red))
            .unwrap();
        game.board_mut()
            .place(at(6, 4), Piece::new(Species::Cat, Side::Blue))
            .unwrap();
        let mut s = session(game);
        s.handle_line("6 3 6 4").unwrap();
        s.prompt().unwrap();

        let text = output(s);
        assert!(text.contains("Red lion captured Blue cat"));
        assert!(text.contains("Game over! Winner: Player1"));
    }

    #[test]
    fn test_new_resets() {
        let mut s = session(Game::new());
        s.handle_line("2 0 3 0").unwrap();
        s.handle_line("NEW").unwrap();
        assert_eq!(s.game().board(), &Board::standard());
        assert!(output(s).contains("New game started!"));
    }

    #[test]
    fn test_moves_command() {
        let mut s = session(Game::new());
        s.handle_line("moves 2 0").unwrap();
        s.handle_line("moves 4 3").unwrap();
        let text = output(s);
        assert!(text.contains("Red rat at (2, 0) can move to: (1, 0) (2, 1) (3, 0)"));
        assert!(text.contains("No piece at (4, 3)"));
    }

    #[test]
    fn test_save_and_load_commands() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("game1");

        let mut s = session(Game::new());
        s.handle_line("2 0 3 0").unwrap();
        s.handle_line(&format!("save {}", base.display())).unwrap();
        s.handle_line("new").unwrap();
        assert_eq!(s.game().to_move(), Side::Red);

        let saved = dir.path().join("game1.jungle");
        assert!(saved.exists());
        s.handle_line(&format!("load {}", saved.display())).unwrap();
        assert_eq!(s.game().to_move(), Side::Blue);
        assert_eq!(
            s.game().board().piece_at(at(3, 0)),
            Some(Piece::new(Species::Rat, Side::Red))
        );

        s.handle_line(&format!("load {}", base.display())).unwrap();
        let text = output(s);
        assert!(text.contains("Game saved to"));
        assert!(text.contains("Game loaded successfully"));
        assert!(text.contains("Failed to load game"));
    }

    #[test]
    fn test_record_and_replay() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("match");

        let mut s = session(Game::new().with_names(PlayerNames::new("Ann", "Bo")));
        s.handle_line("2 0 3 0").unwrap();
        s.handle_line("6 6 5 6").unwrap();
        s.handle_line(&format!("record {}", base.display())).unwrap();
        s.handle_line("new").unwrap();

        let recorded = dir.path().join("match.record");
        s.handle_line(&format!("replay {}", recorded.display())).unwrap();
        // The live game is untouched by a replay.
        assert_eq!(s.game().board(), &Board::standard());
        assert!(s.game().transcript().is_empty());

        let text = output(s);
        assert!(text.contains("Record saved to"));
        assert!(text.contains("Starting replay..."));
        assert!(text.contains("Current player: Ann\nExecuting: 2 0 3 0"));
        assert!(text.contains("Current player: Bo\nExecuting: 6 6 5 6"));
        assert!(text.contains("Replay finished"));
    }

    #[test]
    fn test_replay_stops_on_illegal_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.record");
        std::fs::write(&path, "P1:A\nP2:B\nMOVES:\n2 0 3 0\n2 6 3 6\n").unwrap();

        let mut s = session(Game::new());
        s.handle_line(&format!("replay {}", path.display())).unwrap();
        let text = output(s);
        assert!(text.contains("Replay stopped at move 2"));
        assert!(!text.contains("Replay finished"));
    }

    #[test]
    fn test_replay_empty_or_missing() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.record");
        std::fs::write(&empty, "P1:A\nP2:B\nMOVES:\n").unwrap();

        let mut s = session(Game::new());
        s.handle_line(&format!("replay {}", empty.display())).unwrap();
        s.handle_line(&format!("replay {}", dir.path().join("nope").display()))
            .unwrap();
        let text = output(s);
        assert!(text.contains("No moves found in record"));
        assert!(text.contains("Failed to read record"));
    }

    #[test]
    fn test_replay_interrupted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.record");
        std::fs::write(&path, "MOVES:\n2 0 3 0\n6 6 5 6\n").unwrap();

        let interrupt = Interrupt::default();
        let mut s = session(Game::new()).with_interrupt(interrupt.clone());
        // Nothing is listening outside a replay.
        assert!(!interrupt.trigger());

        interrupt.begin();
        assert!(interrupt.trigger());
        let mut game = Game::new();
        let moves = [(at(2, 0), at(3, 0))];
        s.play_back(&mut game, &moves).unwrap();
        interrupt.end();

        assert!(game.transcript().is_empty());
        assert!(output(s).contains("Replay interrupted"));
    }

    #[test]
    fn test_run_until_exit() {
        let mut s = session(Game::new());
        s.run("2 0 3 0\nexit\n6 6 5 6\n".as_bytes()).unwrap();
        assert_eq!(s.game().transcript().len(), 1);
        let text = output(s);
        assert!(text.contains("Enter your command:"));
        assert!(text.contains("Game ended by player."));
    }

    #[test]
    fn test_run_until_eof() {
        let mut s = session(Game::new());
        s.run("2 0 3 0\n6 6 5 6\n".as_bytes()).unwrap();
        assert_eq!(s.game().transcript().len(), 2);
    }

    #[test]
    fn test_ask_names() {
        let mut out = Vec::new();
        let names = ask_names("Ann\n\n".as_bytes(), &mut out, &PlayerNames::default()).unwrap();
        assert_eq!(names, PlayerNames::new("Ann", "Player2"));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Enter name for Player 1 (leave empty for default):"));
        assert!(text.contains("Enter name for Player 2 (leave empty for default):"));
    }
}
