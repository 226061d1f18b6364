//! Element accessors over a parsed metadata document.
//!
//! Optional elements read as `None`, present but unparsable ones are errors.

use alloc::string::ToString;
use core::str::FromStr;

use roxmltree::{Node, TextPos};

use crate::loader::LoadError;
use crate::{Name, NameHash};

#[inline]
pub(super) fn pos(node: Node<'_, '_>) -> TextPos {
    node.document().text_pos_at(node.range().start)
}

/// First child element with the given tag.
#[inline]
pub(super) fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(tag))
}

/// Entries of a collection element, `<Classes><Class/>...</Classes>`.
pub(super) fn entries<'a, 'input>(
    node: Node<'a, 'input>,
    collection: &'static str,
    entry: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    child(node, collection)
        .into_iter()
        .flat_map(move |list| list.children().filter(move |child| child.has_tag_name(entry)))
}

/// Trimmed text of a child element; `None` if the element is missing.
pub(super) fn text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    child(node, tag).map(|element| element.text().unwrap_or("").trim())
}

/// Parses a child element as an integer.
pub(super) fn integer<T: FromStr>(
    node: Node<'_, '_>,
    tag: &'static str,
) -> Result<Option<T>, LoadError> {
    let Some(element) = child(node, tag) else {
        return Ok(None);
    };
    let text = element.text().unwrap_or("").trim();
    parse_integer(element, tag, text).map(Some)
}

fn parse_integer<T: FromStr>(
    element: Node<'_, '_>,
    tag: &'static str,
    text: &str,
) -> Result<T, LoadError> {
    text.parse().map_err(|_| LoadError::InvalidInteger {
        element: tag,
        text: text.to_string(),
        pos: pos(element),
    })
}

/// Reads a child element as a boolean; only `true`, in any case, is true.
pub(super) fn boolean(node: Node<'_, '_>, tag: &str) -> bool {
    text(node, tag).is_some_and(|text| text.eq_ignore_ascii_case("true"))
}

/// Reads a `<Tag str="text">hash</Tag>` name element.
///
/// The hash is computed from the text when the element has no content. A
/// missing element or one with neither text nor hash is the empty name.
pub(super) fn name(node: Node<'_, '_>, tag: &'static str) -> Result<Name, LoadError> {
    let Some(element) = child(node, tag) else {
        return Ok(Name::default());
    };
    let text = element.attribute("str").unwrap_or("");
    let raw = element.text().unwrap_or("").trim();

    let hash = if !raw.is_empty() {
        // Hashes are written as unsigned 32-bit values, older exporters
        // wrote them signed.
        let value: i64 = parse_integer(element, tag, raw)?;
        NameHash::from_raw(value as u32)
    } else if text.is_empty() {
        NameHash::NONE
    } else {
        NameHash::of(text)
    };
    Ok(Name::with_hash(text, hash))
}

#[cfg(test)]
mod tests {
    use roxmltree::Document;

    use super::{boolean, entries, integer, name};
    use crate::NameHash;
    use crate::loader::LoadError;

    #[test]
    fn names_prefer_written_hash() {
        let doc = Document::parse(
            r#"<R>
                <A str="int">42</A>
                <B str="int"/>
                <C str="">0</C>
                <D str="neg">-1</D>
            </R>"#,
        )
        .unwrap();
        let root = doc.root_element();

        assert_eq!(name(root, "A").unwrap().hash(), NameHash::from_raw(42));
        assert_eq!(name(root, "B").unwrap().hash(), NameHash::of("int"));
        assert!(name(root, "C").unwrap().is_none());
        assert_eq!(name(root, "D").unwrap().hash().get(), u32::MAX);
        assert!(name(root, "Missing").unwrap().is_none());
    }

    #[test]
    fn integers_and_booleans() {
        let doc = Document::parse(
            "<R><Size> 16 </Size><Bad>1x</Bad><IsPOD>TRUE</IsPOD><IsConst>yes</IsConst></R>",
        )
        .unwrap();
        let root = doc.root_element();

        assert_eq!(integer::<u64>(root, "Size").unwrap(), Some(16));
        assert_eq!(integer::<u64>(root, "Offset").unwrap(), None);
        let err = integer::<i64>(root, "Bad").unwrap_err();
        assert!(matches!(err, LoadError::InvalidInteger { element: "Bad", .. }));

        assert!(boolean(root, "IsPOD"));
        assert!(!boolean(root, "IsConst"));
        assert!(!boolean(root, "Missing"));
    }

    #[test]
    fn collection_entries_filter_by_tag() {
        let doc = Document::parse(
            "<R><Fields><Field/><Comment/><Field/></Fields><Field/></R>",
        )
        .unwrap();
        assert_eq!(entries(doc.root_element(), "Fields", "Field").count(), 2);
        assert_eq!(entries(doc.root_element(), "Classes", "Class").count(), 0);
    }
}
