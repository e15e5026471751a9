//! Update blocks: the tokens of one segment, grouped for post-processing.

use scripture_versification::ScriptureRef;

use crate::token::{UsfmToken, UsfmTokenType};

/// What a block element holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsfmUpdateBlockElementType {
    /// A text token.
    Text,
    /// A paragraph marker.
    Paragraph,
    /// A whole note or figure.
    Embed,
    /// A character style marker or its end.
    Style,
    /// Verse, chapter, milestone and other markers.
    Other,
}

impl UsfmUpdateBlockElementType {
    /// Element type for a single token.
    #[must_use]
    pub fn for_token(token: &UsfmToken) -> Self {
        match token.token_type {
            UsfmTokenType::Text => Self::Text,
            UsfmTokenType::Paragraph => Self::Paragraph,
            UsfmTokenType::Character | UsfmTokenType::End | UsfmTokenType::Attribute => {
                Self::Style
            }
            _ => Self::Other,
        }
    }
}

/// A run of tokens inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsfmUpdateBlockElement {
    /// What the tokens are.
    pub element_type: UsfmUpdateBlockElementType,
    /// The tokens.
    pub tokens: Vec<UsfmToken>,
    /// Tokens that the update removed. They are kept for inspection but not
    /// written out.
    pub marked_for_removal: bool,
}

impl UsfmUpdateBlockElement {
    /// Creates an element.
    #[must_use]
    pub fn new(
        element_type: UsfmUpdateBlockElementType,
        tokens: Vec<UsfmToken>,
        marked_for_removal: bool,
    ) -> Self {
        Self {
            element_type,
            tokens,
            marked_for_removal,
        }
    }

    /// The tokens to write, empty when marked for removal.
    #[must_use]
    pub fn output_tokens(&self) -> &[UsfmToken] {
        if self.marked_for_removal {
            &[]
        } else {
            &self.tokens
        }
    }
}

/// The tokens of one verse or non-verse segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsfmUpdateBlock {
    /// Locations the block covers.
    pub refs: Vec<ScriptureRef>,
    /// Elements in document order.
    pub elements: Vec<UsfmUpdateBlockElement>,
}

impl UsfmUpdateBlock {
    /// Creates an empty block.
    #[must_use]
    pub fn new(refs: Vec<ScriptureRef>) -> Self {
        Self {
            refs,
            elements: Vec::new(),
        }
    }

    /// Adds one token as its own element.
    pub fn add_token(&mut self, token: UsfmToken, marked_for_removal: bool) {
        let element_type = UsfmUpdateBlockElementType::for_token(&token);
        self.elements.push(UsfmUpdateBlockElement::new(
            element_type,
            vec![token],
            marked_for_removal,
        ));
    }

    /// Adds a note or figure as one element.
    pub fn add_embed(&mut self, tokens: Vec<UsfmToken>, marked_for_removal: bool) {
        self.elements.push(UsfmUpdateBlockElement::new(
            UsfmUpdateBlockElementType::Embed,
            tokens,
            marked_for_removal,
        ));
    }

    /// Adds an element.
    pub fn push(&mut self, element: UsfmUpdateBlockElement) {
        self.elements.push(element);
    }

    /// Appends the refs of another block that was merged into this one.
    pub fn extend_refs(&mut self, refs: impl IntoIterator<Item = ScriptureRef>) {
        for scripture_ref in refs {
            if !self.refs.contains(&scripture_ref) {
                self.refs.push(scripture_ref);
            }
        }
    }

    /// All tokens that will be written, in order.
    #[must_use]
    pub fn output_tokens(&self) -> Vec<UsfmToken> {
        self.elements
            .iter()
            .flat_map(|e| e.output_tokens().iter().cloned())
            .collect()
    }

    /// Text elements that will be written.
    pub fn text_elements_mut(&mut self) -> impl Iterator<Item = &mut UsfmUpdateBlockElement> {
        self.elements.iter_mut().filter(|e| {
            e.element_type == UsfmUpdateBlockElementType::Text && !e.marked_for_removal
        })
    }
}
