//! Hardcoded roadmaps used when the LLM is unavailable or returns junk.
//!
//! A template is picked by career track (keyword match on the goal) and
//! level: 1 for a first roadmap, then one level up per finished roadmap,
//! capped at `MAX_LEVEL`.

use serde::Serialize;

use crate::models::roadmap::{Resource, ResourceKind, RoadmapDraft, StepDraft, WeeklySchedule};
use crate::models::user::Profile;

pub const MAX_LEVEL: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Web,
    Data,
    Generic,
}

impl Track {
    pub fn from_goal(goal: &str) -> Self {
        let goal = goal.to_lowercase();
        let web = ["web", "frontend", "backend", "full stack", "full-stack"];
        let data = ["data", "ai", "learning"];
        if web.iter().any(|k| goal.contains(k)) {
            Track::Web
        } else if data.iter().any(|k| goal.contains(k)) {
            Track::Data
        } else {
            Track::Generic
        }
    }

    fn default_goal(&self) -> &'static str {
        match self {
            Track::Web => "Web Developer",
            Track::Data => "Data Scientist",
            Track::Generic => "Software Developer",
        }
    }
}

/// Level of the roadmap that follows one finished at `completed_order`.
pub fn next_level(completed_order: i32) -> u8 {
    (completed_order.max(0) + 1).min(MAX_LEVEL as i32) as u8
}

/// Builds the template roadmap for the profile's track at `level` (clamped to 1..=3).
pub fn template_roadmap(profile: &Profile, level: u8) -> RoadmapDraft {
    let raw_goal = profile
        .career_goal
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty());
    let track = Track::from_goal(raw_goal.unwrap_or_default());
    let goal = raw_goal.unwrap_or(track.default_goal());
    let level = level.clamp(1, MAX_LEVEL);

    let (suffix, overview, timeframe, steps) = match (track, level) {
        (Track::Web, 1) => (
            None,
            "Learn how the web works and build responsive, interactive sites with HTML, CSS, JavaScript and a modern framework.",
            "3-4 Months",
            web_foundations(),
        ),
        (Track::Web, 2) => (
            Some("Intermediate"),
            "Build on your foundations with backend development, databases, and API design to become a full-stack developer.",
            "3-4 Months",
            web_intermediate(),
        ),
        (Track::Web, _) => (
            Some("Advanced"),
            "Master advanced topics like system design, performance optimization, testing strategies, and cloud infrastructure.",
            "4-5 Months",
            web_advanced(),
        ),
        (Track::Data, 1) => (
            None,
            "Start your data journey with Python, statistics, and the core tools for cleaning, analysing and visualising data.",
            "3-4 Months",
            data_foundations(),
        ),
        (Track::Data, 2) => (
            Some("Intermediate"),
            "Advance your data science skills with machine learning, statistical modeling, and real-world data projects.",
            "3-4 Months",
            data_intermediate(),
        ),
        (Track::Data, _) => (
            Some("Advanced"),
            "Master advanced AI topics including NLP, computer vision, and production ML systems.",
            "4-5 Months",
            data_advanced(),
        ),
        (Track::Generic, 1) => (
            None,
            "Build solid programming foundations: one language in depth, core data structures, version control and a first real project.",
            "3-4 Months",
            generic_foundations(),
        ),
        (Track::Generic, 2) => (
            Some("Intermediate"),
            "Level up with advanced programming concepts, software engineering practices, and real-world application development.",
            "3-4 Months",
            generic_intermediate(),
        ),
        (Track::Generic, _) => (
            Some("Advanced"),
            "Prepare for senior-level roles with system design, cloud infrastructure, and interview preparation.",
            "4-5 Months",
            generic_advanced(),
        ),
    };

    let career_path = match suffix {
        Some(suffix) => format!("{goal} - {suffix}"),
        None => goal.to_string(),
    };

    RoadmapDraft {
        career_path,
        overview: overview.to_string(),
        estimated_timeframe: timeframe.to_string(),
        steps,
        weekly_schedule: weekly_schedule(track),
    }
}

fn weekly_schedule(track: Track) -> WeeklySchedule {
    let (monday, wednesday, friday, saturday) = match track {
        Track::Web => (
            "Theory & concepts (1.5h)",
            "Practice problems (1h)",
            "Code review & refactoring (1.5h)",
            "Deep project work (3h)",
        ),
        Track::Data => (
            "Theory & math foundations (1.5h)",
            "Paper reading & research (1h)",
            "Model experimentation (1.5h)",
            "Deep project work (3h)",
        ),
        Track::Generic => (
            "Theory & concepts (1.5h)",
            "Practice problems (1h)",
            "Code review & learning (1.5h)",
            "Deep work session (3h)",
        ),
    };
    let tuesday = match track {
        Track::Data => "Hands-on coding with datasets (2h)",
        _ => "Hands-on coding (2h)",
    };
    WeeklySchedule {
        monday: monday.to_string(),
        tuesday: tuesday.to_string(),
        wednesday: wednesday.to_string(),
        thursday: "Project work (2h)".to_string(),
        friday: friday.to_string(),
        saturday: saturday.to_string(),
        sunday: "Rest & planning".to_string(),
    }
}

fn step(
    number: usize,
    title: &str,
    description: &str,
    duration: &str,
    skills: &[&str],
    resources: Vec<Resource>,
    milestones: &[&str],
) -> StepDraft {
    StepDraft {
        id: format!("step-{number}"),
        title: title.to_string(),
        description: description.to_string(),
        duration: duration.to_string(),
        resources,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        milestones: milestones.iter().map(|s| s.to_string()).collect(),
        completed: false,
        progress: 0,
    }
}

use ResourceKind::{Book, Course, Documentation, Tutorial};

fn web_foundations() -> Vec<StepDraft> {
    vec![
        step(
            1,
            "HTML & CSS Foundations",
            "Learn semantic HTML, the box model, Flexbox and Grid, and responsive design.",
            "4 Weeks",
            &["HTML5", "CSS3", "Flexbox", "Responsive Design"],
            vec![
                Resource::new("MDN Learn Web Development", Documentation, "The canonical web platform guide."),
                Resource::new("freeCodeCamp Responsive Web Design", Course, "Project-based HTML and CSS."),
            ],
            &["Build a responsive landing page", "Recreate a layout with CSS Grid"],
        ),
        step(
            2,
            "JavaScript Fundamentals",
            "Variables, functions, arrays, objects, the DOM, events and asynchronous code.",
            "5 Weeks",
            &["JavaScript", "DOM", "Events", "Async/Await"],
            vec![
                Resource::new("JavaScript.info", Tutorial, "Modern JavaScript tutorial."),
                Resource::new("Eloquent JavaScript", Book, "A thorough introduction to the language."),
            ],
            &["Build an interactive to-do app", "Fetch and render data from a public API"],
        ),
        step(
            3,
            "Git & Developer Tooling",
            "Version control, the command line, package managers and browser dev tools.",
            "2 Weeks",
            &["Git", "GitHub", "npm", "DevTools"],
            vec![Resource::new("Pro Git Book", Book, "Complete Git reference.")],
            &["Publish a project on GitHub", "Use branches and pull requests"],
        ),
        step(
            4,
            "React Essentials",
            "Components, props, state, hooks and client-side routing.",
            "5 Weeks",
            &["React", "Hooks", "Component Design", "Routing"],
            vec![Resource::new("React Documentation", Documentation, "Official React guide.")],
            &["Build a multi-page React app", "Manage state with hooks"],
        ),
        step(
            5,
            "Portfolio Project",
            "Plan, build and deploy a portfolio site that showcases your projects.",
            "3 Weeks",
            &["Deployment", "Accessibility", "Project Planning"],
            vec![Resource::new("Vercel Deployment Guide", Documentation, "Deploy frontend apps.")],
            &["Deploy your portfolio", "Collect feedback from two peers"],
        ),
    ]
}

fn web_intermediate() -> Vec<StepDraft> {
    vec![
        step(
            1,
            "Node.js & Express Backend",
            "Build server-side applications with Node.js and Express. Learn REST API design, middleware, and authentication.",
            "5 Weeks",
            &["Node.js", "Express", "REST APIs", "Authentication"],
            vec![
                Resource::new("Node.js Official Docs", Documentation, "Complete Node.js guide."),
                Resource::new("The Odin Project - NodeJS", Course, "Full-stack JavaScript curriculum."),
            ],
            &["Build a REST API with CRUD operations", "Implement JWT authentication"],
        ),
        step(
            2,
            "Databases & ORM",
            "Master relational and NoSQL databases. Learn SQL, PostgreSQL, MongoDB, and ORMs like Prisma.",
            "4 Weeks",
            &["SQL", "PostgreSQL", "MongoDB", "Prisma ORM"],
            vec![
                Resource::new("SQLBolt", Tutorial, "Interactive SQL lessons."),
                Resource::new("Prisma Documentation", Documentation, "Modern database toolkit."),
            ],
            &["Design a normalized database schema", "Build a full-stack app with Prisma"],
        ),
        step(
            3,
            "Full-Stack Project & Deployment",
            "Combine frontend and backend skills to build and deploy a production-ready full-stack application.",
            "6 Weeks",
            &["Next.js", "Deployment", "CI/CD", "Docker Basics"],
            vec![Resource::new("Vercel Deployment Guide", Documentation, "Deploy Next.js apps.")],
            &["Deploy a full-stack app to production", "Set up CI/CD pipeline"],
        ),
    ]
}

fn web_advanced() -> Vec<StepDraft> {
    vec![
        step(
            1,
            "System Design & Architecture",
            "Learn to design scalable systems. Study microservices, caching, load balancing, and message queues.",
            "6 Weeks",
            &["System Design", "Microservices", "Caching", "Message Queues"],
            vec![Resource::new("System Design Primer", Documentation, "Learn system design concepts.")],
            &["Design a scalable e-commerce system", "Implement a caching layer"],
        ),
        step(
            2,
            "Testing & Quality Assurance",
            "Master testing strategies including unit tests, integration tests, E2E tests, and TDD.",
            "4 Weeks",
            &["Jest", "Cypress", "TDD", "Integration Testing"],
            vec![Resource::new("Testing JavaScript", Course, "Comprehensive testing guide.")],
            &["Achieve 80%+ test coverage on a project", "Implement E2E tests"],
        ),
        step(
            3,
            "Cloud & DevOps Essentials",
            "Deploy and manage applications on cloud platforms. Learn AWS/GCP basics, Docker, and Kubernetes.",
            "6 Weeks",
            &["AWS", "Docker", "Kubernetes", "Monitoring"],
            vec![Resource::new("AWS Free Tier", Documentation, "Hands-on cloud experience.")],
            &["Deploy a containerized application", "Set up monitoring and alerting"],
        ),
        step(
            4,
            "Portfolio & Interview Prep",
            "Build an impressive portfolio, practice system design interviews, and prepare for technical assessments.",
            "4 Weeks",
            &["Portfolio", "Interview Prep", "DSA Review", "Behavioral"],
            vec![Resource::new("LeetCode", Tutorial, "Practice coding problems.")],
            &["Complete portfolio website", "Solve 100 LeetCode problems"],
        ),
    ]
}

fn data_foundations() -> Vec<StepDraft> {
    vec![
        step(
            1,
            "Python Programming",
            "Core Python: data types, control flow, functions, modules and notebooks.",
            "4 Weeks",
            &["Python", "Jupyter", "Functions", "Modules"],
            vec![
                Resource::new("Python for Everybody", Course, "Beginner-friendly Python course."),
                Resource::new("Automate the Boring Stuff", Book, "Practical Python programming."),
            ],
            &["Write 20 small Python scripts", "Complete a notebook-based mini project"],
        ),
        step(
            2,
            "Math & Statistics Essentials",
            "Descriptive statistics, probability, distributions and linear algebra basics.",
            "4 Weeks",
            &["Statistics", "Probability", "Linear Algebra"],
            vec![Resource::new("Khan Academy Statistics", Course, "Free statistics lessons.")],
            &["Explain mean, variance and correlation on real data", "Solve 30 probability exercises"],
        ),
        step(
            3,
            "Data Wrangling with Pandas",
            "Load, clean, reshape and join tabular data with NumPy and Pandas.",
            "4 Weeks",
            &["NumPy", "Pandas", "Data Cleaning"],
            vec![Resource::new("Pandas Documentation", Documentation, "Official user guide.")],
            &["Clean a messy public dataset", "Join three datasets into one analysis table"],
        ),
        step(
            4,
            "Data Visualization",
            "Communicate findings with Matplotlib and Seaborn charts.",
            "3 Weeks",
            &["Matplotlib", "Seaborn", "Storytelling"],
            vec![Resource::new("Kaggle Data Visualization", Tutorial, "Hands-on plotting lessons.")],
            &["Publish a dashboard-style notebook"],
        ),
        step(
            5,
            "Exploratory Analysis Project",
            "Run an end-to-end analysis on a dataset you care about and share the results.",
            "3 Weeks",
            &["EDA", "SQL Basics", "Reporting"],
            vec![Resource::new("Kaggle Datasets", Documentation, "Thousands of open datasets.")],
            &["Share a written analysis with charts"],
        ),
    ]
}

fn data_intermediate() -> Vec<StepDraft> {
    vec![
        step(
            1,
            "Machine Learning Fundamentals",
            "Learn supervised and unsupervised learning algorithms, model evaluation, and scikit-learn.",
            "6 Weeks",
            &["Scikit-learn", "Regression", "Classification", "Clustering"],
            vec![Resource::new("Andrew Ng's ML Course", Course, "Stanford's legendary ML course.")],
            &["Build 3 ML models on real datasets", "Achieve 90%+ accuracy on a classification task"],
        ),
        step(
            2,
            "Deep Learning & Neural Networks",
            "Explore deep learning with TensorFlow/PyTorch. Build CNNs, RNNs, and transformers.",
            "8 Weeks",
            &["PyTorch", "CNNs", "RNNs", "Transfer Learning"],
            vec![Resource::new("Fast.ai", Course, "Practical deep learning for coders.")],
            &["Build an image classifier", "Train a text generation model"],
        ),
        step(
            3,
            "Data Engineering & MLOps",
            "Learn to deploy ML models, build data pipelines, and manage ML workflows in production.",
            "5 Weeks",
            &["MLOps", "Data Pipelines", "Model Deployment", "MLflow"],
            vec![Resource::new("Made With ML", Course, "MLOps best practices.")],
            &["Deploy an ML model as an API", "Build an automated data pipeline"],
        ),
    ]
}

fn data_advanced() -> Vec<StepDraft> {
    vec![
        step(
            1,
            "Natural Language Processing",
            "Master NLP with transformers, BERT, GPT, and build real-world text applications.",
            "6 Weeks",
            &["NLP", "Transformers", "Hugging Face", "Text Classification"],
            vec![Resource::new("Hugging Face Course", Course, "NLP with transformers.")],
            &["Build a sentiment analyzer", "Fine-tune a language model"],
        ),
        step(
            2,
            "Computer Vision",
            "Learn image processing, object detection, segmentation, and generative models.",
            "6 Weeks",
            &["OpenCV", "YOLO", "GANs", "Image Segmentation"],
            vec![Resource::new("PyImageSearch", Tutorial, "Computer vision tutorials.")],
            &["Build an object detection system", "Create a style transfer application"],
        ),
        step(
            3,
            "Portfolio & Kaggle Competitions",
            "Build your data science portfolio and compete in Kaggle to sharpen your skills.",
            "6 Weeks",
            &["Kaggle", "Portfolio", "Feature Engineering", "Ensemble Methods"],
            vec![Resource::new("Kaggle", Tutorial, "Data science competitions.")],
            &["Complete 3 Kaggle competitions", "Publish portfolio with 5+ projects"],
        ),
    ]
}

fn generic_foundations() -> Vec<StepDraft> {
    vec![
        step(
            1,
            "Programming Fundamentals",
            "Pick one language and learn variables, control flow, functions and basic I/O.",
            "5 Weeks",
            &["Variables", "Control Flow", "Functions", "Debugging"],
            vec![
                Resource::new("CS50x", Course, "Harvard's introduction to computer science."),
                Resource::new("Think Python", Book, "How to think like a computer scientist."),
            ],
            &["Solve 30 beginner exercises", "Write a command-line game"],
        ),
        step(
            2,
            "Data Structures & Algorithms Basics",
            "Arrays, lists, hash maps, stacks, queues, sorting and searching.",
            "5 Weeks",
            &["Data Structures", "Algorithms", "Big-O"],
            vec![Resource::new("Grokking Algorithms", Book, "An illustrated guide to algorithms.")],
            &["Implement five core data structures", "Explain the complexity of your solutions"],
        ),
        step(
            3,
            "Version Control with Git",
            "Track changes, branch, merge and collaborate on GitHub.",
            "2 Weeks",
            &["Git", "GitHub", "Branching"],
            vec![Resource::new("Pro Git Book", Book, "Complete Git reference.")],
            &["Host all your exercises on GitHub"],
        ),
        step(
            4,
            "Problem Solving Practice",
            "Build fluency by solving progressively harder problems on a schedule.",
            "3 Weeks",
            &["Problem Solving", "Testing", "Refactoring"],
            vec![Resource::new("Exercism", Tutorial, "Mentored coding exercises.")],
            &["Solve 50 practice problems"],
        ),
        step(
            5,
            "First Capstone Project",
            "Design and ship a small application end to end.",
            "3 Weeks",
            &["Project Planning", "Documentation", "Deployment"],
            vec![Resource::new("The Odin Project", Course, "Project-driven curriculum.")],
            &["Ship a project with a README and tests"],
        ),
    ]
}

fn generic_intermediate() -> Vec<StepDraft> {
    vec![
        step(
            1,
            "Advanced Programming & Design Patterns",
            "Master advanced OOP, functional programming, SOLID principles, and common design patterns.",
            "5 Weeks",
            &["Design Patterns", "SOLID", "Functional Programming", "Clean Code"],
            vec![Resource::new("Refactoring Guru", Documentation, "Design patterns explained visually.")],
            &["Implement 5 design patterns", "Refactor a codebase using SOLID principles"],
        ),
        step(
            2,
            "Web Development & APIs",
            "Build full-stack web applications with modern frameworks, REST APIs, and databases.",
            "6 Weeks",
            &["React", "Node.js", "REST APIs", "SQL"],
            vec![Resource::new("Full Stack Open", Course, "University of Helsinki's full-stack course.")],
            &["Build a full-stack CRUD app", "Design and document a REST API"],
        ),
        step(
            3,
            "Version Control & Collaboration",
            "Master Git workflows, code review, open source contribution, and team collaboration practices.",
            "3 Weeks",
            &["Git", "GitHub", "Code Review", "Open Source"],
            vec![Resource::new("Pro Git Book", Book, "Complete Git reference.")],
            &["Contribute to an open source project", "Master Git branching strategies"],
        ),
    ]
}

fn generic_advanced() -> Vec<StepDraft> {
    vec![
        step(
            1,
            "System Design & Architecture",
            "Learn to design large-scale distributed systems, microservices, and cloud-native applications.",
            "6 Weeks",
            &["System Design", "Distributed Systems", "Microservices", "Cloud Architecture"],
            vec![Resource::new("Designing Data-Intensive Applications", Book, "The definitive guide to system design.")],
            &["Design 5 system architectures", "Build a microservices application"],
        ),
        step(
            2,
            "DevOps & Cloud",
            "Master CI/CD, Docker, Kubernetes, and cloud platforms for production deployment.",
            "5 Weeks",
            &["Docker", "Kubernetes", "CI/CD", "AWS/GCP"],
            vec![Resource::new("Docker Documentation", Documentation, "Container fundamentals.")],
            &["Containerize and deploy an application", "Set up a CI/CD pipeline"],
        ),
        step(
            3,
            "DSA & Interview Preparation",
            "Master data structures, algorithms, and practice for technical interviews at top companies.",
            "8 Weeks",
            &["Data Structures", "Algorithms", "Dynamic Programming", "System Design Interviews"],
            vec![Resource::new("NeetCode", Tutorial, "Curated coding interview prep.")],
            &["Solve 150 LeetCode problems", "Complete 5 mock interviews"],
        ),
        step(
            4,
            "Portfolio & Career Launch",
            "Build a professional portfolio, optimize your resume, and apply for dream roles.",
            "4 Weeks",
            &["Portfolio", "Resume", "Networking", "Personal Brand"],
            vec![Resource::new("Tech Interview Handbook", Documentation, "Complete interview guide.")],
            &["Launch portfolio website", "Apply to 20+ positions"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(goal: &str) -> Profile {
        Profile {
            career_goal: Some(goal.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_track_from_goal_keywords() {
        assert_eq!(Track::from_goal("Frontend Engineer"), Track::Web);
        assert_eq!(Track::from_goal("Full Stack Developer"), Track::Web);
        assert_eq!(Track::from_goal("Machine Learning Engineer"), Track::Data);
        assert_eq!(Track::from_goal("Data Analyst"), Track::Data);
        assert_eq!(Track::from_goal("Embedded Systems"), Track::Generic);
    }

    #[test]
    fn test_next_level_caps_at_max() {
        assert_eq!(next_level(1), 2);
        assert_eq!(next_level(2), 3);
        assert_eq!(next_level(7), 3);
        assert_eq!(next_level(0), 1);
    }

    #[test]
    fn test_level_one_keeps_goal_as_career_path() {
        let draft = template_roadmap(&profile("Web Developer"), 1);
        assert_eq!(draft.career_path, "Web Developer");
        assert_eq!(draft.steps[0].title, "HTML & CSS Foundations");
        assert_eq!(draft.weekly_schedule.sunday, "Rest & planning");
    }

    #[test]
    fn test_levels_append_suffix() {
        let intermediate = template_roadmap(&profile("Data Scientist"), 2);
        assert_eq!(intermediate.career_path, "Data Scientist - Intermediate");
        assert_eq!(intermediate.steps[0].title, "Machine Learning Fundamentals");
        let advanced = template_roadmap(&profile("Data Scientist"), 9);
        assert_eq!(advanced.career_path, "Data Scientist - Advanced");
    }

    #[test]
    fn test_missing_goal_uses_track_default() {
        let draft = template_roadmap(&Profile::default(), 2);
        assert_eq!(draft.career_path, "Software Developer - Intermediate");
    }

    #[test]
    fn test_every_template_is_well_formed() {
        for goal in ["web", "data", "other"] {
            for level in 1..=MAX_LEVEL {
                let draft = template_roadmap(&profile(goal), level);
                assert!(!draft.steps.is_empty());
                for (i, step) in draft.steps.iter().enumerate() {
                    assert_eq!(step.id, format!("step-{}", i + 1));
                    assert!(!step.skills.is_empty());
                    assert!(!step.resources.is_empty());
                    assert!(!step.milestones.is_empty());
                    assert!(!step.completed);
                }
            }
        }
    }
}
