use crate::model::{DiaryEntry, EntryDate};

struct Sample {
    date: (i32, u8, u8),
    title: &'static str,
    content: &'static str,
    tags: &'static [&'static str],
}

const SAMPLES: &[Sample] = &[
    Sample {
        date: (2024, 6, 25),
        title: "Deploying My First Full-Stack Project",
        content: "Today was a monumental day as I finally deployed my first full-stack project. \
After months of development, testing, and debugging, I pushed the code to the live server. \
The application is running smoothly, and seeing it live is incredibly satisfying. \
This project has been a significant learning experience, and I feel more confident in my skills \
as a full-stack developer. I look forward to gathering user feedback and continuously improving \
the application.",
        tags: &["full-stack", "deployment", "project", "achievement", "learning"],
    },
    Sample {
        date: (2024, 6, 24),
        title: "Solving a Complex Bug",
        content: "Yesterday was challenging but rewarding. I spent hours troubleshooting a complex \
bug that was causing data inconsistencies in the application. After extensive debugging and \
researching online forums, I finally identified the root cause and implemented a fix. \
The sense of relief and accomplishment was immense. This experience taught me the importance \
of persistence and thorough testing.",
        tags: &["debugging", "problem-solving", "coding", "achievement", "learning"],
    },
    Sample {
        date: (2024, 6, 23),
        title: "Learning a New Framework",
        content: "Today was all about learning. I decided to dive into a new JavaScript framework \
that I've been hearing a lot about. The documentation was extensive, but I managed to build a \
small project by the end of the day. It's exciting to see how different frameworks can enhance \
productivity and offer new perspectives on problem-solving. I'm eager to integrate this new \
knowledge into my upcoming projects.",
        tags: &["learning", "JavaScript", "framework", "development", "coding"],
    },
    Sample {
        date: (2024, 6, 22),
        title: "Collaborating with the Design Team",
        content: "Today was a great day for collaboration. I spent the afternoon working closely \
with the design team to refine the user interface of our application. We brainstormed ideas and \
implemented some key changes that significantly improved the user experience. It's amazing how \
much can be achieved when developers and designers work together. I'm looking forward to seeing \
how users respond to the new design.",
        tags: &["collaboration", "design", "UI/UX", "teamwork", "development"],
    },
    Sample {
        date: (2024, 6, 21),
        title: "Overcoming Impostor Syndrome",
        content: "Today was a bit tough as I struggled with impostor syndrome. Despite my \
achievements, I sometimes feel like I'm not good enough. I talked to a mentor about these \
feelings, and they reminded me of how far I've come and the importance of self-compassion. \
It's a journey, and it's okay to have doubts. I'm going to focus on celebrating small victories \
and continue to learn and grow.",
        tags: &["impostor syndrome", "self-doubt", "growth", "mental health", "learning"],
    },
    Sample {
        date: (2024, 6, 20),
        title: "Attending a Tech Conference",
        content: "Today I returned from an inspiring tech conference. The event was filled with \
insightful talks, hands-on workshops, and networking opportunities. I learned about the latest \
trends in web development, met some industry leaders, and connected with fellow developers. \
The highlight was a keynote speech about the future of full-stack development, which left me \
feeling motivated and excited about my career path. I can't wait to apply what I've learned to \
my work.",
        tags: &["tech conference", "networking", "inspiration", "learning", "development"],
    },
];

/// Built-in entries the session starts with.
pub fn sample_entries() -> Vec<DiaryEntry> {
    SAMPLES
        .iter()
        .filter_map(|sample| {
            let (year, month, day) = sample.date;
            let date = EntryDate::from_ymd(year, month, day).ok()?;
            Some(DiaryEntry::new(
                date,
                sample.title,
                sample.content,
                sample.tags.iter().map(|tag| tag.to_string()).collect(),
            ))
        })
        .collect()
}
