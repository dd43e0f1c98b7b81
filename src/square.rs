use std::fmt;

pub const BOARD_SIZE: u8 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub file: u8,
    pub rank: u8,
}

impl Square {
    pub const fn new(file: u8, rank: u8) -> Self {
        Square { file, rank }
    }

    pub fn try_new(file: i8, rank: i8) -> Option<Self> {
        if (0..BOARD_SIZE as i8).contains(&file) && (0..BOARD_SIZE as i8).contains(&rank) {
            Some(Square::new(file as u8, rank as u8))
        } else {
            None
        }
    }

    pub fn from_index(index: usize) -> Self {
        Square::new(
            (index % BOARD_SIZE as usize) as u8,
            (index / BOARD_SIZE as usize) as u8,
        )
    }

    pub fn index(&self) -> usize {
        self.rank as usize * BOARD_SIZE as usize + self.file as usize
    }

    /// The square `df` files and `dr` ranks away, if it is still on the board.
    pub fn offset(&self, df: i8, dr: i8) -> Option<Self> {
        Square::try_new(self.file as i8 + df, self.rank as i8 + dr)
    }

    pub fn is_light(&self) -> bool {
        (self.file + self.rank) % 2 == 1
    }

    pub fn file_char(&self) -> char {
        (b'a' + self.file) as char
    }

    pub fn rank_char(&self) -> char {
        (b'1' + self.rank) as char
    }

    pub fn to_algebraic(&self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }

    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = chars.next().and_then(file_from_char)?;
        let rank = chars.next().and_then(rank_from_char)?;

        if chars.next().is_some() {
            return None;
        }

        Some(Square::new(file, rank))
    }
}

pub fn file_from_char(c: char) -> Option<u8> {
    if ('a'..='h').contains(&c) {
        Some(c as u8 - b'a')
    } else {
        None
    }
}

pub fn rank_from_char(c: char) -> Option<u8> {
    if ('1'..='8').contains(&c) {
        Some(c as u8 - b'1')
    } else {
        None
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}
