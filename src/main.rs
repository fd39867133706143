// Biblioteca - Personal Library Catalog CLI
// Interactive menu over the file-backed catalog store

use std::io::{self, Write};

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use biblioteca::{Book, Library, DATA_FILE};

fn main() -> Result<()> {
    init_logger();

    println!("📚 Biblioteca v{}", biblioteca::VERSION);

    // Construct (load), operate, save on exit
    let mut library = Library::open(DATA_FILE);
    println!("✓ Catalog ready: {} books\n", library.len());

    run_menu(&mut library)
}

fn init_logger() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("biblioteca=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();
}

fn run_menu(library: &mut Library) -> Result<()> {
    loop {
        show_menu();
        let choice = prompt("Choose an option: ")?;

        match choice.as_str() {
            "1" => add_book(library)?,
            "2" => remove_book(library)?,
            "3" => list_available(library),
            "4" => search_books(library)?,
            "5" => mark_loaned(library)?,
            "6" => return_book(library)?,
            "7" => {
                save_catalog(library);
                println!("Thanks for using Biblioteca. Goodbye!");
                break;
            }
            _ => println!("Invalid option. Please try again."),
        }
    }

    Ok(())
}

fn show_menu() {
    println!("\n--- Library Catalog ---");
    println!("1. Add book");
    println!("2. Remove book");
    println!("3. List available books");
    println!("4. Search books by title");
    println!("5. Mark book as loaned");
    println!("6. Return book");
    println!("7. Exit");
}

fn add_book(library: &mut Library) -> Result<()> {
    println!("\n--- Add Book ---");
    let title = prompt("Title: ")?;
    let author = prompt("Author: ")?;
    let year = prompt("Publication year: ")?;
    let digital = prompt("Is it digital? (y/n): ")?;

    let book = if digital.eq_ignore_ascii_case("y") {
        let format = prompt("Format (PDF, ePub): ")?;
        Book::digital(title, author, year, format)
    } else {
        Book::new(title, author, year)
    };

    let title = book.title.clone();
    match library.add(book) {
        Ok(()) => println!("✓ Book '{}' added.", title),
        Err(err) => eprintln!("❌ {}", err),
    }

    Ok(())
}

fn remove_book(library: &mut Library) -> Result<()> {
    println!("\n--- Remove Book ---");
    let title = prompt("Title of the book to remove: ")?;

    match library.remove(&title) {
        Ok(removed) => println!("✓ Book '{}' removed.", removed.title),
        Err(err) => eprintln!("❌ {}", err),
    }

    Ok(())
}

fn list_available(library: &Library) {
    let available = library.available();

    if available.is_empty() {
        println!("\n--- No books available. ---");
        return;
    }

    println!("\n--- Available Books ---");
    print_numbered(&available);
}

fn search_books(library: &Library) -> Result<()> {
    println!("\n--- Search Books ---");
    let query = prompt("Enter the title or part of the title: ")?;

    let results = library.search(&query);
    if results.is_empty() {
        println!("No matches found.");
        return Ok(());
    }

    println!("\n--- Search Results ---");
    print_numbered(&results);

    Ok(())
}

fn mark_loaned(library: &mut Library) -> Result<()> {
    println!("\n--- Loan Book ---");
    let title = prompt("Title of the book to loan: ")?;

    match library.mark_loaned(&title) {
        Ok(()) => println!("✓ Book '{}' marked as Loaned.", title),
        Err(err) => eprintln!("❌ {}", err),
    }

    Ok(())
}

fn return_book(library: &mut Library) -> Result<()> {
    println!("\n--- Return Book ---");
    let title = prompt("Title of the book to return: ")?;

    match library.return_book(&title) {
        Ok(true) => println!("✓ Book '{}' returned and available.", title),
        Ok(false) => println!("Book '{}' is already available.", title),
        Err(err) => eprintln!("❌ {}", err),
    }

    Ok(())
}

fn save_catalog(library: &Library) {
    match library.save() {
        Ok(count) => println!("✓ Saved {} books to '{}'.", count, library.path().display()),
        Err(err) => eprintln!("❌ Could not save the catalog: {:#}", err),
    }
}

fn print_numbered(books: &[&Book]) {
    for (i, book) in books.iter().enumerate() {
        println!("{}. {}", i + 1, book);
    }
    println!("{}", "-".repeat(30));
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin().read_line(&mut line)?;
    if read == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
    }
    Ok(line.trim().to_string())
}
