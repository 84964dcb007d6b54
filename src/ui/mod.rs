//! Static page content and the server-rendered HTML page.

pub mod page;

use serde::Serialize;

use crate::ner::Category;

pub use page::{IndexPage, ResultView, Tab};

/// Example paragraphs offered under the input form.
pub const EXAMPLES: [&str; 2] = [
    "Під час відвідування Риму, ми вирішили піднятися на вершину Колізею, щоб помилуватися \
     панорамою Форуму Роману, а потім відвідати Ватиканські музеї та побачити Сикстинську капелу.",
    "На фестивалі 'Atlas Weekend' гурт 'Океан Ельзи' презентував нову пісню, а співачка Джамала \
     виконала свій хіт, який переміг на 'Євробаченні'.",
];

/// One usage step shown on the help tab.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Instruction {
    pub step: &'static str,
    pub substeps: &'static [&'static str],
}

pub const INSTRUCTIONS: &[Instruction] = &[
    Instruction {
        step: "Відкрийте програму через веб-браузер",
        substeps: &[],
    },
    Instruction {
        step: "На головній сторінці:",
        substeps: &[
            "Введіть текст у текстове поле;",
            "Натисніть кнопку \"Проаналізувати\".",
        ],
    },
    Instruction {
        step: "Ознайомтеся з результатами:",
        substeps: &[
            "Текст із виділеними назвами з’явиться у синьому кольорі;",
            "Список знайдених назв відобразиться окремо.",
        ],
    },
    Instruction {
        step: "Використовуйте вкладку \"Інформація про типи назв\" для довідки щодо категорій.",
        substeps: &[],
    },
];

/// One row of the category legend.
#[derive(Debug, Clone, Serialize)]
pub struct LegendEntry {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub fn legend() -> Vec<LegendEntry> {
    Category::ALL
        .iter()
        .map(|category| LegendEntry {
            code: category.code(),
            name: category.english_name(),
            description: category.description(),
        })
        .collect()
}

/// Example text by index, if it exists.
pub fn example(index: usize) -> Option<&'static str> {
    EXAMPLES.get(index).copied()
}
