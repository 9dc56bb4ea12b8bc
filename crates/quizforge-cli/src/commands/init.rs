//! The `quizforge init` command.

use std::path::{Path, PathBuf};

use anyhow::Result;

pub fn execute(output: PathBuf) -> Result<()> {
    if Path::new("quizforge.toml").exists() {
        println!("quizforge.toml already exists, skipping.");
    } else {
        std::fs::write("quizforge.toml", SAMPLE_CONFIG)?;
        println!("Created quizforge.toml");
    }

    if output.exists() {
        println!("{} already exists, skipping.", output.display());
    } else {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&output, EXAMPLE_QUIZ)?;
        println!("Created {}", output.display());
    }

    let quiz = output.display();
    println!("\nNext steps:");
    println!("  1. Edit {quiz} with your assessments and rubrics");
    println!("  2. Run: quizforge validate --input {quiz}");
    println!(
        "  3. Run: quizforge grade --input {quiz} --assessment US24352_A1 \
         --question eye_protection --answer \"It prevents eye injury\""
    );
    println!("  4. Run: quizforge export --input {quiz}");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizforge configuration

# Directory holding the saved draft and view state
store_dir = "./.quizforge"

# Where `quizforge export` writes <APP_ID>_v<VERSION>.json
output_dir = "./quizforge-export"
"#;

const EXAMPLE_QUIZ: &str = r#"{
  "APP_ID": "US24352_SAFETY",
  "VERSION": "1",
  "APP_TITLE": "Workshop Safety",
  "APP_SUBTITLE": "Unit standard 24352",
  "DEADLINE": {
    "day": 30,
    "month": 11,
    "label": "Submission deadline"
  },
  "TEACHERS": [
    {
      "id": "t1",
      "name": "Workshop Teacher",
      "email": "teacher@example.com"
    }
  ],
  "ASSESSMENTS": [
    {
      "id": "US24352_A1",
      "title": "Safe machine use",
      "subtitle": "Personal protective equipment and isolation",
      "usNumber": "24352",
      "usVersion": "2",
      "credits": 2,
      "standardType": "internal",
      "questions": [
        {
          "id": "before_maintenance",
          "text": "What must you do before maintaining a machine?",
          "image": "blank.jpg",
          "hint": "",
          "type": "mc",
          "maxPoints": 1,
          "rubric": [
            {
              "points": 1,
              "check": "Lock out and tag the machine",
              "flags": "i"
            }
          ],
          "options": [
            "Lock out and tag the machine",
            "Ask someone to watch the switch",
            "Work quickly"
          ]
        },
        {
          "id": "eye_protection",
          "text": "Why do we wear safety glasses on the lathe?",
          "image": "blank.jpg",
          "hint": "Think about swarf.",
          "type": "short",
          "maxPoints": 2,
          "rubric": [
            {
              "points": 2,
              "check": "(?:eye injury|blindness)",
              "flags": "i"
            }
          ]
        }
      ]
    }
  ]
}"#;
