/// One node reported as added by the document's mutation observer, already
/// narrowed down to what the classifier cares about.
#[derive(Clone, Debug, PartialEq)]
pub enum InsertedNode<I> {
    /// The inserted node is itself an image.
    Image(I),
    /// A container; holds its descendant images that lack a `loading` attribute.
    Container(Vec<I>),
    /// Text, comments and other non-element nodes.
    Other,
}

impl<I> InsertedNode<I> {
    pub fn into_images(self) -> Vec<I> {
        match self {
            InsertedNode::Image(image) => vec![image],
            InsertedNode::Container(images) => images,
            InsertedNode::Other => Vec::new(),
        }
    }
}
