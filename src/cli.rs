use std::path::PathBuf;
use std::sync::Arc;

use dialoguer::{Input, Password};

use eventsports_client::config::{default_config_path, ClientConfig};
use eventsports_client::context::ClientContext;
use eventsports_client::error::{ClientError, Result};
use eventsports_client::guard::{GuardDecision, RouteRequest, EVENT_ID_PARAM};
use eventsports_client::navigation::{routes, HistoryNavigator, Navigator, Redirect, MESSAGE_PARAM};
use eventsports_client::services::{CategoryService, EventService};
use eventsports_client::token;
use eventsports_client::ui::{ConsoleNotifier, UI};
use eventsports_client::version::format_version_info;

use crate::{
    Commands, ConfigArgs, ConfigCommand, EventArgs, EventsArgs, LeaderboardArgs, LoginArgs,
    ResultsArgs, WorkoutsArgs,
};

/// CLI handler for processing commands
pub struct CliHandler {
    config_path: PathBuf,
    navigator: Arc<HistoryNavigator>,
    context: ClientContext,
    ui: UI,
}

impl CliHandler {
    pub fn new(config_path: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let config_path = config_path.unwrap_or_else(default_config_path);
        let config = ClientConfig::builder()
            .config_file(&config_path)
            .verbose(verbose)
            .build()?;

        let navigator = Arc::new(HistoryNavigator::new(routes::DASHBOARD));
        let context = ClientContext::new(
            config,
            navigator.clone(),
            Arc::new(ConsoleNotifier::new()),
        )?;

        Ok(Self {
            config_path,
            navigator,
            context,
            ui: UI::new(),
        })
    }

    /// Execute a CLI command
    pub async fn execute(&mut self, command: Commands) -> Result<()> {
        let result = match command {
            Commands::Login(args) => self.handle_login(args).await,
            Commands::Logout => self.handle_logout().await,
            Commands::Status => self.handle_status(),
            Commands::Events(args) => self.handle_events(args).await,
            Commands::Event(args) => self.handle_event(args).await,
            Commands::Leaderboard(args) => self.handle_leaderboard(args).await,
            Commands::Workouts(args) => self.handle_workouts(args).await,
            Commands::Results(args) => self.handle_results(args).await,
            Commands::Config(args) => self.handle_config(args).await,
        };

        let forced_logout = self.context.settle().await;
        if forced_logout && result.is_err() {
            self.ui.warning("Execute `inscricao login` para entrar novamente.");
        }
        result
    }

    /// Apply a guard decision; a denial is reported and becomes an error
    fn enforce(&self, decision: GuardDecision) -> Result<()> {
        let redirect = decision.redirect().cloned();
        if decision.resolve(self.navigator.as_ref() as &dyn Navigator) {
            return Ok(());
        }

        let redirect = redirect.ok_or_else(|| ClientError::internal("denied without redirect"))?;
        if redirect.path == routes::LOGIN {
            self.ui.warning("Você precisa entrar primeiro: `inscricao login`.");
            return Err(ClientError::session_not_found());
        }

        let message = redirect
            .query_value(MESSAGE_PARAM)
            .unwrap_or("Acesso negado")
            .to_string();
        self.ui.error(&message);
        Err(ClientError::authorization(message))
    }

    async fn handle_login(&mut self, args: LoginArgs) -> Result<()> {
        let email = match args.email {
            Some(email) => email,
            None => Input::<String>::new()
                .with_prompt("Email")
                .interact_text()?,
        };
        let password = Password::new().with_prompt("Senha").interact()?;

        let session = self.context.auth.login(&email, &password).await?;
        self.navigator
            .navigate(&Redirect::new(self.context.config.default_landing.clone()));
        self.ui.success(&format!(
            "Bem-vindo, {} ({})",
            session.user.name,
            self.context.auth.user_type_display()
        ));
        Ok(())
    }

    async fn handle_logout(&mut self) -> Result<()> {
        self.context.auth.logout().await;
        self.ui.success("Sessão encerrada.");
        Ok(())
    }

    fn handle_status(&mut self) -> Result<()> {
        let auth = &self.context.auth;
        let authenticated = auth.is_authenticated();
        let access_token = auth.get_token();

        let mut rows = vec![
            ("Versão", format_version_info()),
            (
                "Autenticação",
                self.ui.format_auth_status(
                    authenticated,
                    token::is_near_expiration(access_token.as_deref()),
                ),
            ),
        ];

        if authenticated {
            let user = auth.get_current_user();
            rows.push(("Nome", auth.current_user_name()));
            rows.push(("Email", self.ui.format_user_field(user.map(|u| u.email))));
            rows.push(("Perfil", self.ui.format_user_field(Some(auth.user_type_display()))));
            rows.push(("Token", token::format_expiration(access_token.as_deref())));
        }

        rows.push(("Servidor", self.context.config.base_url.clone()));
        self.ui.card("Status", rows);
        Ok(())
    }

    async fn handle_events(&mut self, args: EventsArgs) -> Result<()> {
        let service = self.context.events();
        let events = match &args.status {
            Some(status) => service.list_by_status(status).await?,
            None => service.list().await?,
        };

        self.ui.header("Eventos");
        if events.is_empty() {
            self.ui.info("Nenhum evento encontrado.");
            return Ok(());
        }
        for event in &events {
            let open = if EventService::is_open(event) {
                " · inscrições abertas"
            } else {
                ""
            };
            println!(
                "{:>5}  {}  [{}]{}",
                event.id,
                event.nome,
                self.ui.format_event_status(&event.status),
                open
            );
        }
        Ok(())
    }

    async fn handle_event(&mut self, args: EventArgs) -> Result<()> {
        let event = self.context.events().get(args.id).await?;
        let categories = self.context.categories().list_by_event(args.id).await?;

        self.ui.card(
            &event.nome,
            vec![
                ("Status", self.ui.format_event_status(&event.status)),
                ("Início", self.ui.format_user_field(event.data_inicio_do_evento.clone())),
                ("Fim", self.ui.format_user_field(event.data_fim_do_evento.clone())),
                ("Organizador", self.ui.format_user_field(event.nome_organizador.clone())),
                ("Local", self.ui.format_user_field(event.cidade.clone())),
                ("Inscrições ativas", event.inscricoes_ativas.to_string()),
            ],
        );

        self.ui.header("Categorias");
        for category in CategoryService::active_only(categories) {
            let fee = category
                .valor_inscricao
                .map(|v| format!("R$ {:.2}", v))
                .unwrap_or_else(|| "-".to_string());
            let registrable = if CategoryService::can_register(&category) {
                ""
            } else {
                " (fechada)"
            };
            println!("{:>5}  {}  {}{}", category.id, category.nome, fee, registrable);
        }
        Ok(())
    }

    async fn handle_leaderboard(&mut self, args: LeaderboardArgs) -> Result<()> {
        let service = self.context.leaderboard();

        if args.ranking {
            let ranking = service.ranking(args.event_id, args.category_id).await?;
            self.ui.header("Ranking");
            for row in ranking {
                println!(
                    "{:>3}º  {}  {} pts  ({} workouts)",
                    row.posicao, row.nome_participante, row.pontuacao_total, row.workouts_completados
                );
            }
            return Ok(());
        }

        let board = service
            .by_event_and_category(args.event_id, args.category_id)
            .await?;
        self.ui
            .header(board.categoria.as_deref().unwrap_or("Leaderboard"));
        for entry in board.entries {
            println!("{:>3}º  {}  {:.1}", entry.posicao, entry.nome, entry.pontuacao);
        }
        Ok(())
    }

    async fn handle_workouts(&mut self, args: WorkoutsArgs) -> Result<()> {
        let route = RouteRequest::new(format!("/eventos/{}/workouts", args.event_id));
        self.enforce(self.context.auth_guard().can_activate(&route))?;

        let workouts = self.context.workouts().by_event(args.event_id).await?;
        self.ui.header("Workouts");
        for workout in workouts {
            println!(
                "{:>5}  {}  [{}]  {}",
                workout.id,
                workout.nome,
                workout.tipo,
                workout.nomes_categorias.unwrap_or_default()
            );
        }
        Ok(())
    }

    async fn handle_results(&mut self, args: ResultsArgs) -> Result<()> {
        let route = RouteRequest::new(format!("/eventos/{}/resultados", args.event_id))
            .with_param(EVENT_ID_PARAM, args.event_id.clone());
        self.navigator.visit(&route.url);
        let decision = self.context.event_owner_guard().can_activate(&route).await;
        self.enforce(decision)?;

        let service = self.context.workouts();
        let status = service.status(args.workout_id, args.category_id).await?;
        let results = service.results(args.workout_id, args.category_id).await?;

        self.ui.card(
            status.nome_workout.as_deref().unwrap_or("Workout"),
            vec![
                ("Categoria", self.ui.format_user_field(status.nome_categoria.clone())),
                (
                    "Finalizados",
                    format!(
                        "{}/{} ({:.0}%)",
                        status.participantes_finalizados,
                        status.total_participantes,
                        status.porcentagem_finalizados
                    ),
                ),
            ],
        );

        self.ui.status(
            "Workout",
            if status.workout_finalizado {
                "finalizado"
            } else {
                "em andamento"
            },
            status.workout_finalizado,
        );

        for result in results {
            println!(
                "{:>3}  {}  {}{}",
                result
                    .posicao_workout
                    .map(|p| format!("{}º", p))
                    .unwrap_or_else(|| "-".to_string()),
                result.nome_participante,
                result.resultado_formatado.unwrap_or_default(),
                if result.finalizado { "" } else { " (pendente)" }
            );
        }
        Ok(())
    }

    async fn handle_config(&mut self, args: ConfigArgs) -> Result<()> {
        match args.command {
            ConfigCommand::Show => {
                let config = &self.context.config;
                self.ui.card(
                    "Configuração",
                    vec![
                        ("Arquivo", self.config_path.display().to_string()),
                        ("Base URL", config.base_url.clone()),
                        ("Timeout", format!("{}s", config.timeout)),
                        (
                            "Sessão",
                            if config.persist_session {
                                config.session_path().display().to_string()
                            } else {
                                "memória".to_string()
                            },
                        ),
                        (
                            "Atraso de expiração",
                            format!("{}ms", config.expiry_redirect_delay_ms),
                        ),
                    ],
                );
            }
            ConfigCommand::SetBaseUrl { url } => {
                let mut config = self.context.config.clone();
                config.base_url = url;
                config.validate()?;
                config.save(&self.config_path).await?;
                self.ui.success(&format!("Base URL: {}", config.base_url));
            }
            ConfigCommand::SetTimeout { seconds } => {
                let mut config = self.context.config.clone();
                config.timeout = seconds;
                config.validate()?;
                config.save(&self.config_path).await?;
                self.ui.success(&format!("Timeout: {}s", seconds));
            }
            ConfigCommand::Reset => {
                ClientConfig::default().save(&self.config_path).await?;
                self.ui.success("Configuração restaurada.");
            }
        }
        Ok(())
    }
}
