// Test utilities for assembling small game images without a real data file
use crate::display_headless::HeadlessDisplay;
use crate::header::HEADER_TABLES;
use crate::input::ScriptedInput;
use crate::interpreter::Interpreter;
use crate::picture::{PictureData, MIN_PICTURE_SIZE};
use crate::random::GameRand;
use crate::vm::{Game, VM};

pub const MESSAGES: usize = 0x040;
pub const WORD_DICTIONARY: usize = 0x301;
pub const EXIT_MAP: usize = 0x400;
pub const DICTIONARY: usize = 0x480;
pub const DATA: usize = 0x500;
pub const CODE: usize = 0x600;

pub struct GameImageBuilder {
    messages: Vec<u8>,
    words: Vec<u8>,
    exits: Vec<u8>,
    dictionary: Vec<u8>,
    data: Vec<u8>,
    code: Vec<u8>,
    tables: [u16; HEADER_TABLES],
}

/// Length prefix as stored in front of a record: zero bytes worth 255 each,
/// then the remainder. The stored length counts the final length byte.
pub fn length_prefix(payload_len: usize) -> Vec<u8> {
    let mut l = payload_len + 1;
    let mut out = Vec::new();
    while l > 255 {
        out.push(0);
        l -= 255;
    }
    out.push(l as u8);
    out
}

/// Encode printable ASCII as message bytes
pub fn encode_text(s: &str) -> Vec<u8> {
    s.bytes()
        .map(|c| match c {
            b' ' => 0x5F - 0x1D,
            b'\n' => 0x25 - 0x1D,
            c => c - 0x1D,
        })
        .collect()
}

impl GameImageBuilder {
    pub fn new() -> Self {
        let mut tables = [DATA as u16; HEADER_TABLES];
        tables[0] = EXIT_MAP as u16;
        tables[1] = DICTIONARY as u16;
        // table 2 in the scratch lists
        tables[2] = 0x8000;
        tables[11] = CODE as u16;
        GameImageBuilder {
            messages: Vec::new(),
            words: Vec::new(),
            exits: Vec::new(),
            dictionary: Vec::new(),
            data: Vec::new(),
            code: Vec::new(),
            tables,
        }
    }

    /// Append a length-prefixed message record
    pub fn message(&mut self, payload: &[u8]) -> &mut Self {
        self.messages.extend(length_prefix(payload.len()));
        self.messages.extend_from_slice(payload);
        self
    }

    pub fn text_message(&mut self, s: &str) -> &mut Self {
        let payload = encode_text(s);
        self.message(&payload)
    }

    /// Raw bytes for the message area (used for the separated format)
    pub fn raw_messages(&mut self, bytes: &[u8]) -> &mut Self {
        self.messages.extend_from_slice(bytes);
        self
    }

    /// Append a length-prefixed word dictionary record
    pub fn word(&mut self, payload: &[u8]) -> &mut Self {
        self.words.extend(length_prefix(payload.len()));
        self.words.extend_from_slice(payload);
        self
    }

    pub fn raw_words(&mut self, bytes: &[u8]) -> &mut Self {
        self.words.extend_from_slice(bytes);
        self
    }

    /// Exit list for the next location: (direction, flags, target)
    pub fn location_exits(&mut self, exits: &[(u8, u8, u8)]) -> &mut Self {
        for (i, (dir, flags, target)) in exits.iter().enumerate() {
            let mut b = ((flags & 7) << 4) | (dir & 0x0F);
            if i + 1 == exits.len() {
                b |= 0x80;
            }
            self.exits.push(b);
            self.exits.push(*target);
        }
        self
    }

    pub fn dictionary_word(&mut self, word: &str, code: u8) -> &mut Self {
        let bytes = word.as_bytes();
        for (i, c) in bytes.iter().enumerate() {
            let mut c = c.to_ascii_uppercase();
            if i + 1 == bytes.len() {
                c |= 0x80;
            }
            self.dictionary.push(c);
        }
        self.dictionary.push(code);
        self
    }

    pub fn data(&mut self, bytes: &[u8]) -> &mut Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn table(&mut self, index: usize, value: u16) -> &mut Self {
        self.tables[index] = value;
        self
    }

    pub fn code(&mut self, bytes: &[u8]) -> &mut Self {
        self.code.extend_from_slice(bytes);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let size = (CODE + self.code.len() + 16).max(0x800);
        let mut image = vec![0u8; size];
        image[0..2].copy_from_slice(&(MESSAGES as u16).to_le_bytes());
        image[2..4].copy_from_slice(&(WORD_DICTIONARY as u16).to_le_bytes());
        for (i, t) in self.tables.iter().enumerate() {
            image[4 + i * 2..6 + i * 2].copy_from_slice(&t.to_le_bytes());
        }

        fn place(image: &mut [u8], at: usize, limit: usize, bytes: &[u8]) {
            assert!(at + bytes.len() <= limit, "test image section overflow");
            image[at..at + bytes.len()].copy_from_slice(bytes);
        }
        place(&mut image, MESSAGES, WORD_DICTIONARY - 1, &self.messages);
        // records of the word dictionary start one byte before its pointer
        place(&mut image, WORD_DICTIONARY - 1, EXIT_MAP, &self.words);
        place(&mut image, EXIT_MAP, DICTIONARY, &self.exits);
        let mut dict = self.dictionary.clone();
        dict.push(0x80);
        place(&mut image, DICTIONARY, DATA, &dict);
        place(&mut image, DATA, CODE, &self.data);
        let end = image.len();
        place(&mut image, CODE, end, &self.code);
        image
    }
}

/// Interpreter over the built image with scripted input and a headless
/// display whose output stays readable through the returned handle
pub fn interpreter(builder: &GameImageBuilder, input: &[&str]) -> (Interpreter, HeadlessDisplay) {
    let game = Game::from_memory(builder.build()).expect("test image loads");
    let display = HeadlessDisplay::new();
    let interp = Interpreter::new(
        VM::new(game),
        Box::new(display.clone()),
        Box::new(ScriptedInput::new(input.iter().copied())),
    )
    .with_rand(GameRand::new_predictable(1));
    (interp, display)
}

/// Interpreter over a bare image holding just `code`
pub fn run_code(code: &[u8]) -> (Interpreter, HeadlessDisplay) {
    let mut b = GameImageBuilder::new();
    b.code(code);
    interpreter(&b, &[])
}

/// Picture data holding the given records, each `(code, body)`
pub fn picture_data(records: &[(u16, &[u8])]) -> PictureData {
    let mut bytes = Vec::new();
    for &(code, body) in records {
        let len = body.len() + 3;
        bytes.push((code >> 4) as u8);
        bytes.push((((code & 0x0F) << 4) as u8) | ((len >> 8) as u8 & 0x0F));
        bytes.push(len as u8);
        bytes.extend_from_slice(body);
    }
    bytes.push(0xFF);
    bytes.resize(bytes.len().max(MIN_PICTURE_SIZE), 0);
    PictureData::from_bytes(bytes).expect("test picture data loads")
}
