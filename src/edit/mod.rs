pub mod drag;
pub mod editor;
pub mod history;
pub mod keyboard;

pub use drag::{DragData, DropZone, MoveOp, MoveRequest};
pub use editor::ColumnEditor;
pub use history::{Action, ActionKind, History, UndoRedoState};
pub use keyboard::{Focus, KeyboardNav, NavEvent, NavMode, PaneLengths};
