use crate::synth::note::Note;

/// Most notes that can be held down at once.
pub const MAX_HELD_NOTES: usize = 16;

/// The set of held notes. The highest one is the sounding note.
///
/// Fixed capacity so pressing keys never allocates on the audio thread.
/// Notes are kept sorted ascending, so the sounding note is the last slot.
#[derive(Debug, Clone)]
pub struct NoteStack {
    notes: [Note; MAX_HELD_NOTES],
    len: usize,
}

impl NoteStack {
    pub fn new() -> Self {
        Self {
            notes: [Note(0); MAX_HELD_NOTES],
            len: 0,
        }
    }

    /// Add a held note. Returns false if the note was already held or the
    /// stack is full; the stack is unchanged in both cases.
    pub fn insert(&mut self, note: Note) -> bool {
        let at = match self.held().binary_search(&note) {
            Ok(_) => return false,
            Err(at) => at,
        };
        if self.len == MAX_HELD_NOTES {
            return false;
        }

        self.notes.copy_within(at..self.len, at + 1);
        self.notes[at] = note;
        self.len += 1;
        true
    }

    /// Release a note. Returns false if it was not held.
    pub fn remove(&mut self, note: Note) -> bool {
        match self.held().binary_search(&note) {
            Ok(at) => {
                self.notes.copy_within(at + 1..self.len, at);
                self.len -= 1;
                true
            }
            Err(_) => false,
        }
    }

    /// The sounding note: the highest one held.
    pub fn top(&self) -> Option<Note> {
        self.held().last().copied()
    }

    pub fn contains(&self, note: Note) -> bool {
        self.held().binary_search(&note).is_ok()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == MAX_HELD_NOTES
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Held notes, lowest first.
    pub fn held(&self) -> &[Note] {
        &self.notes[..self.len]
    }
}

impl Default for NoteStack {
    fn default() -> Self {
        Self::new()
    }
}
