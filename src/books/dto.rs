use serde::{Deserialize, Serialize};

// BookDto is a data transfer object for records managed by the Book Catalog
// Service. The remote service owns validation; this side only transports the
// fields and uses the isbn as the addressing key for update/delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDto {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publisher: String,
    pub pages: u32,
}

impl BookDto {
    pub fn new(title: &str, author: &str, isbn: &str, publisher: &str, pages: u32) -> BookDto {
        BookDto {
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
            publisher: publisher.to_string(),
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::books::dto::BookDto;

    #[tokio::test]
    async fn test_should_build_books() {
        let book = BookDto::new("Dune", "Frank Herbert", "9780441172719", "Ace", 412);
        assert_eq!("9780441172719", book.isbn.as_str());
        assert_eq!("Dune", book.title.as_str());
        assert_eq!(412, book.pages);
    }

    #[tokio::test]
    async fn test_should_serialize_all_fields() {
        let book = BookDto::new("Dune", "Frank Herbert", "9780441172719", "Ace", 412);
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!("Frank Herbert", json["author"]);
        assert_eq!(412, json["pages"]);
        let back: BookDto = serde_json::from_value(json).unwrap();
        assert_eq!(book, back);
    }
}
