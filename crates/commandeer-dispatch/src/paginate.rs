//! Pagination for commands that display lists of results.
//!
//! A collaborator for command bodies, not for the resolution engine: given a
//! result list, a page number, and a formatter, it sends one page of lines
//! to the sender and rejects out-of-range pages with usage-kind errors.

use crate::error::CommandError;
use crate::sender::CommandSender;

/// Formats and sends one page of results at a time.
pub struct Paginator<T> {
    header: String,
    per_page: usize,
    format: Box<dyn Fn(&T, usize) -> String + Send + Sync>,
}

impl<T> Paginator<T> {
    /// A paginator with the default page size of six results.
    pub fn new<F>(header: impl Into<String>, format: F) -> Self
    where
        F: Fn(&T, usize) -> String + Send + Sync + 'static,
    {
        Self {
            header: header.into(),
            per_page: 6,
            format: Box::new(format),
        }
    }

    pub fn per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Number of pages needed for `result_count` results.
    pub fn page_count(&self, result_count: usize) -> usize {
        let mut pages = result_count / self.per_page + 1;
        if result_count % self.per_page == 0 && result_count > 0 {
            pages -= 1;
        }
        pages
    }

    /// Sends the header and the entries of `page` (1-based) to the sender.
    ///
    /// Fails with a usage-kind error when there are no results or the page
    /// is out of range.
    pub fn display<S: CommandSender>(
        &self,
        sender: &S,
        results: &[T],
        page: usize,
    ) -> Result<(), CommandError> {
        if results.is_empty() {
            return Err(CommandError::usage("No results match!"));
        }

        let max_pages = self.page_count(results.len());
        if page == 0 || page > max_pages {
            return Err(CommandError::usage(format!(
                "Unknown page selected! {max_pages} total pages."
            )));
        }

        sender.send_message(&format!("{} (page {}/{})", self.header, page, max_pages));
        let start = self.per_page * (page - 1);
        let end = (self.per_page * page).min(results.len());
        for (index, entry) in results[start..end].iter().enumerate() {
            sender.send_message(&(self.format)(entry, start + index));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sender::SenderType;
    use std::cell::RefCell;

    struct Sink {
        lines: RefCell<Vec<String>>,
    }

    impl Sink {
        fn new() -> Self {
            Self {
                lines: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandSender for Sink {
        fn name(&self) -> &str {
            "sink"
        }

        fn send_message(&self, message: &str) {
            self.lines.borrow_mut().push(message.to_string());
        }

        fn has_permission(&self, _permission: &str) -> bool {
            true
        }

        fn sender_type(&self) -> SenderType {
            SenderType::Console
        }
    }

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("item{i}")).collect()
    }

    fn paginator() -> Paginator<String> {
        Paginator::new("Results", |entry: &String, index| {
            format!("{}. {}", index + 1, entry)
        })
        .per_page(3)
    }

    #[test]
    fn page_count_avoids_a_trailing_blank_page() {
        let p = paginator();
        assert_eq!(p.page_count(1), 1);
        assert_eq!(p.page_count(3), 1);
        assert_eq!(p.page_count(4), 2);
        assert_eq!(p.page_count(6), 2);
    }

    #[test]
    fn displays_header_and_one_page() {
        let sink = Sink::new();
        paginator().display(&sink, &names(5), 2).unwrap();

        let lines = sink.lines.borrow();
        assert_eq!(lines[0], "Results (page 2/2)");
        assert_eq!(&lines[1..], &["4. item3", "5. item4"]);
    }

    #[test]
    fn empty_results_fail() {
        let sink = Sink::new();
        let err = paginator().display(&sink, &[], 1).unwrap_err();
        assert!(matches!(err, CommandError::Usage { .. }));
        assert!(sink.lines.borrow().is_empty());
    }

    #[test]
    fn out_of_range_page_fails_and_names_the_page_count() {
        let sink = Sink::new();
        let err = paginator().display(&sink, &names(4), 3).unwrap_err();
        assert_eq!(err.to_string(), "Unknown page selected! 2 total pages.");
        let err = paginator().display(&sink, &names(4), 0).unwrap_err();
        assert!(matches!(err, CommandError::Usage { .. }));
    }
}
