mod country_scanner;

pub use country_scanner::CountryScanner;
