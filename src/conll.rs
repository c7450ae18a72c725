//! CoNLL-style serialization of aligned phrases
//!
//! One line per token, `id\ttext\tparent\trelation\trole`, with `_` for
//! absent fields and a blank line closing each phrase.

use crate::align::AlignedPhrase;
use crate::graph::Token;
use std::io::{self, Write};

const ABSENT: &str = "_";

/// Format one token as a CoNLL line, without the trailing newline
pub fn token_line(token: &Token) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        token.id,
        token.text,
        token.parent.map_or_else(|| ABSENT.to_string(), |p| p.to_string()),
        token.relation.map_or(ABSENT, |r| r.label()),
        token.role.map_or(ABSENT, |r| r.label()),
    )
}

/// Render a whole phrase block, including the closing blank line
pub fn render(phrase: &AlignedPhrase) -> String {
    let mut block = String::new();
    for token in &phrase.tokens {
        block.push_str(&token_line(token));
        block.push('\n');
    }
    block.push('\n');
    block
}

/// Streams aligned phrases to any writer
pub struct ConllWriter<W: Write> {
    inner: W,
    phrases: usize,
}

impl<W: Write> ConllWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, phrases: 0 }
    }

    pub fn write_phrase(&mut self, phrase: &AlignedPhrase) -> io::Result<()> {
        self.inner.write_all(render(phrase).as_bytes())?;
        self.phrases += 1;
        Ok(())
    }

    /// Number of phrases written so far
    pub fn phrases_written(&self) -> usize {
        self.phrases
    }

    /// Flush and hand back the underlying writer
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::Aligner;
    use crate::corpus::RegionGraph;
    use crate::graph::{Parent, Relation, Role, TokenId};
    use crate::lexicon::SynonymLexicon;
    use std::sync::Arc;

    #[test]
    fn bare_token_uses_placeholders() {
        let token = Token::new(TokenId::new(1), "a", Default::default());
        assert_eq!(token_line(&token), "1\ta\t_\t_\t_");
    }

    #[test]
    fn labels_and_root() {
        let mut same = Token::new(TokenId::new(3), "fire", Default::default());
        same.attach(Parent::Token(TokenId::new(4)), Relation::Same);
        same.claim(Role::Obj);
        assert_eq!(token_line(&same), "3\tfire\t4\tsame\tOBJ");

        let mut root = Token::new(TokenId::new(4), "hydrant", Default::default());
        root.claim(Role::Obj);
        root.parent = Some(Parent::Root);
        assert_eq!(token_line(&root), "4\thydrant\t0\t_\tOBJ");
    }

    #[test]
    fn renders_a_full_phrase() {
        let graph = RegionGraph::new("a dog chases a ball")
            .with_object("dog")
            .with_object("ball")
            .with_relationship("dog", "chases", "ball");
        let phrase = Aligner::new(Arc::new(SynonymLexicon::new()))
            .align(&graph)
            .unwrap();

        let expected = "1\ta\t_\t_\t_\n\
                        2\tdog\t0\t_\tOBJ\n\
                        3\tchases\t2\tPRED\tPRED\n\
                        4\ta\t_\t_\t_\n\
                        5\tball\t3\tOBJT\tOBJ\n\
                        \n";
        assert_eq!(render(&phrase), expected);
    }

    #[test]
    fn empty_phrase_renders_a_bare_separator() {
        let phrase = Aligner::new(Arc::new(SynonymLexicon::new()))
            .align(&RegionGraph::new(" \" ").with_object("dog"))
            .unwrap();
        assert!(phrase.is_empty());
        assert_eq!(render(&phrase), "\n");
    }

    #[test]
    fn writer_separates_phrases_with_blank_lines() {
        let aligner = Aligner::new(Arc::new(SynonymLexicon::new()));
        let mut writer = ConllWriter::new(Vec::new());
        for phrase in ["a cat", "a dog"] {
            let graph = RegionGraph::new(phrase).with_object(&phrase[2..]);
            writer.write_phrase(&aligner.align(&graph).unwrap()).unwrap();
        }
        assert_eq!(writer.phrases_written(), 2);

        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(
            out,
            "1\ta\t_\t_\t_\n2\tcat\t0\t_\tOBJ\n\n1\ta\t_\t_\t_\n2\tdog\t0\t_\tOBJ\n\n"
        );
    }
}
