// src/admin_cli.rs
use crate::app_log;
use crate::auth::AuthConfig;
use crate::core::{AppConfig, Database};
use crate::repositories::{JobRepository, NewJob, UserRepository};
use crate::types::{Job, JobStatus, Role, SalaryRange, User};
use crate::utils::{non_blank, parse_deadline};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use sqlx::SqliteConnection;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jobfinder")]
#[command(about = "Job application API server and administration tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
    /// Manage job postings
    Job {
        #[command(subcommand)]
        command: JobCommand,
    },
    /// Print a bearer token for a user, by id or email
    Token { user: String },
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Add a user
    Add {
        email: String,
        full_name: String,
        /// candidate, employer or admin
        #[arg(long, default_value = "candidate")]
        role: String,
    },
    /// List all users
    List,
    /// Remove a user and everything they own
    Remove { id: String },
}

#[derive(Subcommand)]
pub enum JobCommand {
    /// Post a job for an employer
    Add {
        employer_id: String,
        title: String,
        #[arg(long, default_value = "Draft")]
        status: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        job_type: Option<String>,
        #[arg(long)]
        category_id: Option<String>,
        #[arg(long)]
        salary_min: Option<i64>,
        #[arg(long)]
        salary_max: Option<i64>,
        #[arg(long)]
        currency: Option<String>,
        /// YYYY-MM-DD or RFC 3339
        #[arg(long)]
        deadline: Option<String>,
    },
    /// List jobs, optionally of one employer
    List {
        #[arg(long)]
        employer: Option<String>,
    },
    /// Change a job's status (Active, Closed, Draft, Archived)
    SetStatus { id: String, status: String },
    /// Import jobs from a CSV file with a header row
    Import { csv_file: PathBuf },
}

/// One CSV line of `job import`
#[derive(Debug, Deserialize)]
struct JobCsvRow {
    employer_id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    job_type: Option<String>,
    #[serde(default)]
    category_id: Option<String>,
    #[serde(default)]
    salary_min: Option<i64>,
    #[serde(default)]
    salary_max: Option<i64>,
    #[serde(default)]
    salary_currency: Option<String>,
    #[serde(default)]
    application_deadline: Option<String>,
}

impl JobCsvRow {
    fn into_new_job(self) -> Result<NewJob> {
        let employer_id = self.employer_id.trim();
        let title = self.title.trim();
        if employer_id.is_empty() || title.is_empty() {
            bail!("employer_id and title are required");
        }

        let status = match non_blank(self.status.as_deref()) {
            Some(status) => status.parse()?,
            None => JobStatus::Draft,
        };

        let mut job = NewJob::new(employer_id, title, status);
        job.description = non_blank(self.description.as_deref()).unwrap_or_default();
        job.location = non_blank(self.location.as_deref());
        job.job_type = non_blank(self.job_type.as_deref());
        job.category_id = non_blank(self.category_id.as_deref());
        job.salary = SalaryRange {
            min: self.salary_min,
            max: self.salary_max,
            currency: non_blank(self.salary_currency.as_deref()),
        };
        job.application_deadline = non_blank(self.application_deadline.as_deref())
            .map(|d| parse_deadline(&d))
            .transpose()?;
        Ok(job)
    }
}

/// Parse every data row of a job CSV, keeping the 1-based line number of each
fn read_job_rows<R: Read>(input: R) -> Vec<(usize, Result<NewJob>)> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);

    reader
        .deserialize::<JobCsvRow>()
        .enumerate()
        .map(|(index, row)| {
            let line = index + 2;
            let job = row
                .context("CSV parsing error")
                .and_then(JobCsvRow::into_new_job);
            (line, job)
        })
        .collect()
}

async fn require_employer(conn: &mut SqliteConnection, employer_id: &str) -> Result<User> {
    let user = UserRepository::new(conn)
        .find_by_id(employer_id)
        .await?
        .with_context(|| format!("No user with id {}", employer_id))?;

    if user.role == Role::Candidate {
        bail!("User {} is a candidate and cannot post jobs", user.email);
    }
    Ok(user)
}

async fn import_job(conn: &mut SqliteConnection, new_job: NewJob) -> Result<Job> {
    require_employer(&mut *conn, &new_job.employer_id).await?;
    Ok(JobRepository::new(conn).create(new_job).await?)
}

pub async fn handle_admin_command(command: Command, config: &AppConfig) -> Result<()> {
    let db = Database::connect(&config.database_url).await?;
    let mut conn = db.pool().acquire().await?;

    match command {
        Command::Serve => bail!("serve is not an admin command"),
        Command::User { command } => handle_user_command(command, &mut *conn).await?,
        Command::Job { command } => handle_job_command(command, &mut *conn).await?,
        Command::Token { user } => {
            let auth_config = AuthConfig::new(config.require_jwt_secret()?, config.token_ttl_hours);

            let mut users = UserRepository::new(&mut *conn);
            let found = match users.find_by_id(&user).await? {
                Some(found) => Some(found),
                None => users.find_by_email(&user).await?,
            };
            let Some(found) = found else {
                bail!("No user matches '{}'", user);
            };

            let token = auth_config.issue_token(&found)?;
            app_log!(
                info,
                "Issued {}h token for {} ({})",
                config.token_ttl_hours,
                found.email,
                found.role
            );
            println!("{}", token);
        }
    }

    Ok(())
}

async fn handle_user_command(command: UserCommand, conn: &mut SqliteConnection) -> Result<()> {
    let mut users = UserRepository::new(conn);

    match command {
        UserCommand::Add {
            email,
            full_name,
            role,
        } => {
            let role: Role = role.parse()?;
            match users.create(&email, &full_name, role).await {
                Ok(user) => {
                    app_log!(info, "✅ User created:");
                    app_log!(info, "   Email: {}", user.email);
                    app_log!(info, "   Role: {}", user.role);
                    app_log!(info, "   ID: {}", user.id);
                }
                Err(e) => {
                    app_log!(error, "Failed to create user: {}", e);
                    if e.to_string().contains("UNIQUE constraint failed") {
                        app_log!(info, "❌ Error: Email '{}' already exists", email);
                    } else {
                        app_log!(info, "❌ Error: {}", e);
                    }
                }
            }
        }

        UserCommand::List => {
            let all = users.list().await?;
            if all.is_empty() {
                app_log!(info, "No users found.");
            } else {
                app_log!(
                    info,
                    "{:<38} {:<30} {:<10} {:<20}",
                    "ID",
                    "Email",
                    "Role",
                    "Created"
                );
                app_log!(info, "{}", "-".repeat(100));
                for user in all {
                    app_log!(
                        info,
                        "{:<38} {:<30} {:<10} {:<20}",
                        user.id,
                        user.email,
                        user.role,
                        user.created_at.format("%Y-%m-%d %H:%M")
                    );
                }
            }
        }

        UserCommand::Remove { id } => {
            if users.delete(&id).await? {
                app_log!(info, "✅ User removed: {}", id);
            } else {
                app_log!(info, "❌ No user found with id: {}", id);
            }
        }
    }

    Ok(())
}

async fn handle_job_command(command: JobCommand, conn: &mut SqliteConnection) -> Result<()> {
    match command {
        JobCommand::Add {
            employer_id,
            title,
            status,
            description,
            location,
            job_type,
            category_id,
            salary_min,
            salary_max,
            currency,
            deadline,
        } => {
            require_employer(&mut *conn, &employer_id).await?;

            let mut new_job = NewJob::new(&employer_id, &title, status.parse()?);
            new_job.description = description.unwrap_or_default();
            new_job.location = location;
            new_job.job_type = job_type;
            new_job.category_id = category_id;
            new_job.salary = SalaryRange {
                min: salary_min,
                max: salary_max,
                currency,
            };
            new_job.application_deadline = deadline.as_deref().map(parse_deadline).transpose()?;

            let job = JobRepository::new(&mut *conn).create(new_job).await?;
            app_log!(info, "✅ Job created:");
            app_log!(info, "   Title: {}", job.title);
            app_log!(info, "   Status: {}", job.status);
            app_log!(info, "   ID: {}", job.id);
        }

        JobCommand::List { employer } => {
            let jobs = JobRepository::new(&mut *conn)
                .list(employer.as_deref())
                .await?;
            if jobs.is_empty() {
                app_log!(info, "No jobs found.");
            } else {
                app_log!(
                    info,
                    "{:<38} {:<30} {:<10} {:<10}",
                    "ID",
                    "Title",
                    "Status",
                    "Applicants"
                );
                app_log!(info, "{}", "-".repeat(90));
                for job in jobs {
                    app_log!(
                        info,
                        "{:<38} {:<30} {:<10} {:<10}",
                        job.id,
                        job.title,
                        job.status,
                        job.applicants_count
                    );
                }
            }
        }

        JobCommand::SetStatus { id, status } => {
            let status: JobStatus = status.parse()?;
            if JobRepository::new(&mut *conn).set_status(&id, status).await? {
                app_log!(info, "✅ Job {} is now {}", id, status);
            } else {
                app_log!(info, "❌ No job found with id: {}", id);
            }
        }

        JobCommand::Import { csv_file } => {
            if !csv_file.exists() {
                app_log!(info, "❌ CSV file not found: {}", csv_file.display());
                return Ok(());
            }

            let content = tokio::fs::read(&csv_file)
                .await
                .with_context(|| format!("Failed to read {}", csv_file.display()))?;

            let mut success_count = 0;
            let mut error_count = 0;

            for (line, row) in read_job_rows(content.as_slice()) {
                let result = match row {
                    Ok(new_job) => import_job(&mut *conn, new_job).await,
                    Err(e) => Err(e),
                };

                match result {
                    Ok(job) => {
                        success_count += 1;
                        app_log!(info, "✅ Line {}: added {} ({})", line, job.title, job.id);
                    }
                    Err(e) => {
                        error_count += 1;
                        app_log!(info, "⚠️  Line {}: skipped: {:#}", line, e);
                    }
                }
            }

            app_log!(info, "Import completed:");
            app_log!(info, "  ✅ Success: {}", success_count);
            app_log!(info, "  ❌ Errors:  {}", error_count);
        }
    }

    Ok(())
}
