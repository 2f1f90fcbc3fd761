//! The help chat: a transcript of user and assistant turns, typed or spoken.
//!
//! Speech is a capability handed in from outside. A recognizer delivers at
//! most one utterance per `start`; a synthesizer reads replies aloud.

use std::io::{BufRead, Write};

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

/// Receives what a recognizer heard.
pub trait RecognitionSink {
    fn on_result(&mut self, transcript: &str);
    fn on_error(&mut self, error: &str);
}

pub trait SpeechRecognizer {
    /// Listens for one utterance and reports it (or a failure) to `sink`.
    fn start(&mut self, sink: &mut dyn RecognitionSink);
    fn stop(&mut self);
}

pub trait SpeechSynthesizer {
    fn speak(&mut self, text: &str);
}

pub trait Responder {
    fn respond(&self, message: &str) -> String;
}

const ANSWERS: &[(&[&str], &str)] = &[
    (&["hello", "hi", "hey"], "Hi! Ask me how to search, apply, or manage your profile."),
    (
        &["search", "find", "filter"],
        "Use `jobboard jobs <text>` or press / in `jobboard browse` to search titles, companies and job types.",
    ),
    (
        &["apply", "application"],
        "Open a job with `jobboard show <id>` and run `jobboard apply <id>`. `jobboard applied` lists your applications.",
    ),
    (
        &["resume", "cv"],
        "Run `jobboard profile upload-resume <file>` with a PDF, DOC or DOCX up to 5 MB; parsed details are merged into your profile.",
    ),
    (
        &["profile", "photo", "avatar", "cover"],
        "`jobboard profile show` prints your profile; `profile set`, `profile photo` and `profile cover` change it.",
    ),
    (
        &["company", "companies"],
        "Recruiters register a company with `jobboard company create <name>` and edit it with `company update`.",
    ),
    (
        &["post", "recruit", "hire"],
        "Recruiters post openings with `jobboard admin post` and review candidates with `jobboard applicants <job-id>`.",
    ),
    (&["login", "sign", "account"], "Use `jobboard login` or `jobboard signup` to get started."),
];

const FALLBACK: &str = "I'm not sure about that. Try asking about searching, applying, your resume or your profile.";

/// Answers from a fixed table of keywords about using the board.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordResponder;

impl Responder for KeywordResponder {
    fn respond(&self, message: &str) -> String {
        let lowered = message.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        ANSWERS
            .iter()
            .find(|(keywords, _)| {
                keywords
                    .iter()
                    .any(|keyword| words.iter().any(|word| word.starts_with(keyword)))
            })
            .map(|(_, answer)| answer.to_string())
            .unwrap_or_else(|| FALLBACK.to_string())
    }
}

#[derive(Default)]
struct Heard {
    transcript: Option<String>,
    error: Option<String>,
}

impl RecognitionSink for Heard {
    fn on_result(&mut self, transcript: &str) {
        self.transcript = Some(transcript.to_string());
    }

    fn on_error(&mut self, error: &str) {
        self.error = Some(error.to_string());
    }
}

/// One chat window. It owns a single recognizer for its whole lifetime.
pub struct ChatWidget<R, S, P> {
    transcript: Vec<Turn>,
    recognizer: R,
    synthesizer: S,
    responder: P,
    listening: bool,
    pub speak_replies: bool,
}

impl<R: SpeechRecognizer, S: SpeechSynthesizer, P: Responder> ChatWidget<R, S, P> {
    pub fn new(recognizer: R, synthesizer: S, responder: P) -> Self {
        Self {
            transcript: Vec::new(),
            recognizer,
            synthesizer,
            responder,
            listening: false,
            speak_replies: true,
        }
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Adds the user's message and the reply. Blank messages are ignored.
    pub fn send(&mut self, message: &str) -> Option<&Turn> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }
        self.transcript.push(Turn {
            speaker: Speaker::User,
            text: message.to_string(),
        });
        let reply = self.responder.respond(message);
        if self.speak_replies {
            self.synthesizer.speak(&reply);
        }
        self.transcript.push(Turn {
            speaker: Speaker::Assistant,
            text: reply,
        });
        self.transcript.last()
    }

    /// Listens for one utterance and sends it. `Ok(None)` when nothing was heard.
    pub fn listen(&mut self) -> Result<Option<&Turn>, ClientError> {
        let mut heard = Heard::default();
        self.listening = true;
        self.recognizer.start(&mut heard);
        self.listening = false;

        if let Some(error) = heard.error {
            tracing::debug!(%error, "speech recognition failed");
            return Err(ClientError::validation(format!("Speech recognition error: {}", error)));
        }
        match heard.transcript {
            Some(text) => Ok(self.send(&text)),
            None => Ok(None),
        }
    }

    pub fn stop_listening(&mut self) {
        if self.listening {
            self.recognizer.stop();
            self.listening = false;
        }
    }
}

// --- Terminal capabilities ---

/// Treats each line typed on a reader as one recognized utterance.
pub struct LineRecognizer<B> {
    input: B,
    stopped: bool,
}

impl<B: BufRead> LineRecognizer<B> {
    pub fn new(input: B) -> Self {
        Self {
            input,
            stopped: false,
        }
    }
}

impl<B: BufRead> SpeechRecognizer for LineRecognizer<B> {
    fn start(&mut self, sink: &mut dyn RecognitionSink) {
        if self.stopped {
            sink.on_error("recognizer stopped");
            return;
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => sink.on_error("no-speech"),
            Ok(_) => sink.on_result(line.trim_end_matches(['\r', '\n'])),
            Err(e) => sink.on_error(&e.to_string()),
        }
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}

/// "Speaks" by writing the reply to a terminal stream.
pub struct TerminalSynthesizer<W> {
    out: W,
}

impl<W: Write> TerminalSynthesizer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> SpeechSynthesizer for TerminalSynthesizer<W> {
    fn speak(&mut self, text: &str) {
        for line in textwrap::wrap(text, 78) {
            if writeln!(self.out, "assistant> {}", line).is_err() {
                tracing::warn!("could not write chat reply");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[derive(Default)]
    struct Spoken(Vec<String>);

    impl SpeechSynthesizer for &mut Spoken {
        fn speak(&mut self, text: &str) {
            self.0.push(text.to_string());
        }
    }

    struct Scripted(Vec<Result<String, String>>);

    impl SpeechRecognizer for Scripted {
        fn start(&mut self, sink: &mut dyn RecognitionSink) {
            match self.0.remove(0) {
                Ok(text) => sink.on_result(&text),
                Err(e) => sink.on_error(&e),
            }
        }

        fn stop(&mut self) {}
    }

    #[test]
    fn test_keyword_responder() {
        let responder = KeywordResponder::default();
        assert!(responder.respond("How do I APPLY?").contains("jobboard apply"));
        assert!(responder.respond("upload my resume").contains("5 MB"));
        assert!(responder.respond("what's the weather").starts_with("I'm not sure"));
    }

    #[test]
    fn test_send_appends_both_turns_and_speaks() {
        let mut spoken = Spoken::default();
        let recognizer = Scripted(vec![]);
        let mut widget = ChatWidget::new(recognizer, &mut spoken, KeywordResponder::default());

        assert!(widget.send("   ").is_none());
        let reply = widget.send("hello").unwrap();
        assert_eq!(reply.speaker, Speaker::Assistant);
        assert_eq!(widget.transcript().len(), 2);
        assert_eq!(widget.transcript()[0].text, "hello");
        drop(widget);
        assert_eq!(spoken.0.len(), 1);
    }

    #[test]
    fn test_listen_one_utterance_per_start() {
        let mut spoken = Spoken::default();
        let recognizer = Scripted(vec![Ok("how to search".into()), Err("no-speech".into())]);
        let mut widget = ChatWidget::new(recognizer, &mut spoken, KeywordResponder::default());
        widget.speak_replies = false;

        let turn = widget.listen().unwrap().unwrap();
        assert!(turn.text.contains("browse"));
        assert!(!widget.is_listening());

        let err = widget.listen().unwrap_err();
        assert_eq!(err.to_string(), "Speech recognition error: no-speech");
        assert_eq!(widget.transcript().len(), 2);
        drop(widget);
        assert!(spoken.0.is_empty());
    }

    #[test]
    fn test_line_recognizer() {
        let mut recognizer = LineRecognizer::new(Cursor::new("find rust jobs\n"));
        let mut heard = Heard::default();
        recognizer.start(&mut heard);
        assert_eq!(heard.transcript.as_deref(), Some("find rust jobs"));

        let mut heard = Heard::default();
        recognizer.start(&mut heard);
        assert_eq!(heard.error.as_deref(), Some("no-speech"));

        recognizer.stop();
        let mut heard = Heard::default();
        recognizer.start(&mut heard);
        assert_eq!(heard.error.as_deref(), Some("recognizer stopped"));
    }

    #[test]
    fn test_terminal_synthesizer_wraps() {
        let mut out = Vec::new();
        TerminalSynthesizer::new(&mut out).speak("short reply");
        assert_eq!(String::from_utf8(out).unwrap(), "assistant> short reply\n");
    }
}
